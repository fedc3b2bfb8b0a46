use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use crate::chat::Chat;
use crate::common::{
    current_timestamp, ChatRef, ChatSummary, MessageRef, SystemSnapshot, UserRef, UserSummary,
    UserWeak,
};
use crate::error::{ChatError, ChatResult};
use crate::id_pool::IdPool;
use crate::message::{Message, MessageContent};

/// Registro centrale del sistema: possiede tutti gli utenti e tutte le
/// chat, mantiene gli indici login→utente e id→chat, l'utente attivo
/// della sessione e i due generatori di id (chat e messaggi).
///
/// Tutti gli altri riferimenti nel modello sono deboli: rimuovere un
/// utente o una chat da questo registro basta a renderli eleggibili per
/// la distruzione, e i riferimenti rimasti altrove risolvono ad assente.
#[derive(Debug, Default)]
pub struct ChatSystem {
    users: Vec<UserRef>,
    chats: Vec<ChatRef>,
    login_index: HashMap<String, UserRef>,
    chat_index: HashMap<u64, ChatRef>,
    active_user: Option<UserRef>,
    chat_ids: IdPool,
    message_ids: IdPool,
}

impl ChatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utenti in ordine di registrazione
    pub fn users(&self) -> &[UserRef] {
        &self.users
    }

    pub fn chats(&self) -> &[ChatRef] {
        &self.chats
    }

    pub fn active_user(&self) -> Option<&UserRef> {
        self.active_user.as_ref()
    }

    /// Imposta (o azzera) l'utente attivo. Nessuna verifica che l'utente
    /// sia registrato nel sistema.
    pub fn set_active_user(&mut self, user: Option<UserRef>) {
        self.active_user = user;
    }

    /// Registra un utente. Il login deve essere libero: l'indice dei login
    /// e la lista degli utenti restano sempre allineati.
    pub fn add_user(&mut self, user: UserRef) -> ChatResult<()> {
        let login = user.borrow().login().to_string();
        if self.login_index.contains_key(&login) {
            return Err(ChatError::LoginTaken(login));
        }
        info!("registered user '{}'", login);
        self.login_index.insert(login, user.clone());
        self.users.push(user);
        Ok(())
    }

    pub fn find_user_by_login(&self, login: &str) -> Option<UserRef> {
        self.login_index.get(login).cloned()
    }

    pub fn login_exists(&self, login: &str) -> bool {
        self.login_index.contains_key(login)
    }

    /// Registra una chat: unico punto in cui viene assegnato il chat id
    pub fn add_chat(&mut self, chat: ChatRef) -> ChatResult<u64> {
        if chat.borrow().chat_id().is_some() {
            return Err(ChatError::ChatAlreadyRegistered);
        }
        let chat_id = self.chat_ids.next_id();
        chat.borrow_mut().assign_id(chat_id);
        self.chat_index.insert(chat_id, chat.clone());
        self.chats.push(chat);
        debug!("chat {} registered", chat_id);
        Ok(chat_id)
    }

    pub fn get_chat_by_id(&self, chat_id: u64) -> Option<ChatRef> {
        self.chat_index.get(&chat_id).cloned()
    }

    /// Nuovo id per un messaggio, dal pool condiviso a livello di sistema
    pub fn next_message_id(&mut self) -> u64 {
        self.message_ids.next_id()
    }

    // Rilascio id, per la futura cancellazione di chat e messaggi
    pub fn release_chat_id(&mut self, chat_id: u64) {
        self.chat_ids.release(chat_id);
    }

    pub fn release_message_id(&mut self, message_id: u64) {
        self.message_ids.release(message_id);
    }

    /// Elenco utenti per la visualizzazione: coppie (numero progressivo a
    /// partire da 1, utente), più la posizione in cui si trova — o si
    /// troverebbe, se escluso — l'utente attivo.
    pub fn user_list(&self, include_active: bool) -> (Vec<(usize, UserRef)>, Option<usize>) {
        let mut entries = Vec::new();
        let mut active_position = None;
        let mut index = 1;
        for user in &self.users {
            let is_active = self
                .active_user
                .as_ref()
                .map_or(false, |active| Rc::ptr_eq(active, user));
            if is_active {
                active_position = Some(index - 1);
                if !include_active {
                    continue;
                }
            }
            entries.push((index, user.clone()));
            index += 1;
        }
        (entries, active_position)
    }

    /// Ricerca per sottostringa, senza distinzione di maiuscole, su login
    /// o nome visualizzato. L'utente attivo è sempre escluso dai risultati.
    pub fn find_user_by_text_part(&self, text: &str) -> Vec<UserRef> {
        let needle = text.to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                let is_active = self
                    .active_user
                    .as_ref()
                    .map_or(false, |active| Rc::ptr_eq(active, *user));
                if is_active {
                    return false;
                }
                let user = user.borrow();
                user.login().to_lowercase().contains(&needle)
                    || user.display_name().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Crea una chat con i partecipanti dati, la registra e la collega
    /// alla lista chat di ciascun partecipante
    pub fn create_chat(&mut self, participants: &[UserRef]) -> ChatResult<ChatRef> {
        let chat: ChatRef = Rc::new(RefCell::new(Chat::new()));
        for user in participants {
            chat.borrow_mut().add_participant(user);
        }
        self.add_chat(chat.clone())?;
        for user in participants {
            user.borrow_mut().chat_list_mut().add_chat(&chat);
        }
        Ok(chat)
    }

    /// Compone e accoda un messaggio con l'orario corrente
    pub fn post_message(
        &mut self,
        chat: &ChatRef,
        sender: &UserWeak,
        content: Vec<MessageContent>,
    ) -> ChatResult<MessageRef> {
        self.post_message_at(chat, sender, content, current_timestamp())
    }

    /// Compone e accoda un messaggio con un orario esplicito. Se il
    /// mittente non è più risolvibile il messaggio non viene creato e la
    /// chat resta invariata. Dopo l'invio l'indice di lettura del mittente
    /// viene portato in fondo alla chat (schema "letto fino all'invio").
    pub fn post_message_at(
        &mut self,
        chat: &ChatRef,
        sender: &UserWeak,
        content: Vec<MessageContent>,
        timestamp: String,
    ) -> ChatResult<MessageRef> {
        let sender_ref = sender.upgrade().ok_or(ChatError::SenderUnavailable)?;
        let message: MessageRef = Rc::new(Message::new(
            self.message_ids.next_id(),
            content,
            sender.clone(),
            timestamp,
        ));

        let mut chat_mut = chat.borrow_mut();
        chat_mut.add_message(message.clone());
        let read_up_to = chat_mut.messages().len();
        chat_mut.update_last_read_index(&sender_ref, read_up_to);
        debug!(
            "message {} posted by '{}'",
            message.message_id(),
            sender_ref.borrow().login()
        );
        Ok(message)
    }

    /// Snapshot serializzabile dello stato corrente
    pub fn snapshot(&self) -> SystemSnapshot {
        let users = self
            .users
            .iter()
            .map(|user| {
                let user = user.borrow();
                UserSummary {
                    login: user.login().to_string(),
                    display_name: user.display_name().to_string(),
                    email: user.email().map(str::to_string),
                    phone: user.phone().map(str::to_string),
                    chats: user.chat_list().chats().len(),
                }
            })
            .collect();
        let chats = self
            .chats
            .iter()
            .map(|chat| {
                let chat = chat.borrow();
                ChatSummary {
                    chat_id: chat.chat_id().unwrap_or(0),
                    participants: chat
                        .participants()
                        .iter()
                        .filter_map(|participant| participant.user().upgrade())
                        .map(|user| user.borrow().login().to_string())
                        .collect(),
                    messages: chat.messages().len(),
                }
            })
            .collect();
        SystemSnapshot { users, chats }
    }
}
