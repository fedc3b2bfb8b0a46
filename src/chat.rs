use std::rc::Rc;

use serde::Serialize;

use crate::common::{MessageRef, UserRef, UserWeak};
use crate::error::{ChatError, ChatResult};
use crate::message::MessageContent;
use crate::user::User;
use crate::weak_index::WeakIndex;

/// Collegamento non possessivo tra una chat e un utente. La rimozione
/// dalla chat è soffice: il record resta, cambia solo il flag.
#[derive(Debug)]
pub struct Participant {
    user: UserWeak,
    deleted_from_chat: bool,
}

impl Participant {
    pub fn user(&self) -> UserWeak {
        self.user.clone()
    }

    pub fn deleted_from_chat(&self) -> bool {
        self.deleted_from_chat
    }
}

/// Direzione di un messaggio rispetto all'utente che guarda la chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Proiezione di un messaggio pronta per la visualizzazione. Colori e
/// formattazione restano al livello di presentazione; un mittente ormai
/// cancellato compare come `None`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub direction: Direction,
    pub sender_name: Option<String>,
    pub sender_login: Option<String>,
    pub timestamp: String,
    pub message_id: u64,
    pub content: Vec<MessageContent>,
}

/// Chat: partecipanti, sequenza ordinata (solo accodamento) di messaggi e
/// indici di lettura per utente. L'id viene assegnato una sola volta, al
/// momento della registrazione in `ChatSystem`; prima di allora la chat
/// non è raggiungibile per id.
#[derive(Debug, Default)]
pub struct Chat {
    participants: Vec<Participant>,
    messages: Vec<MessageRef>,
    last_read: WeakIndex<User, usize>,
    chat_id: Option<u64>,
}

impl Chat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat_id(&self) -> Option<u64> {
        self.chat_id
    }

    pub(crate) fn assign_id(&mut self, chat_id: u64) {
        self.chat_id = Some(chat_id);
    }

    /// Aggiunge un partecipante e azzera il suo indice di lettura.
    /// Nessun controllo sui duplicati: è responsabilità del chiamante
    /// non aggiungere due volte lo stesso utente.
    pub fn add_participant(&mut self, user: &UserRef) {
        self.participants.push(Participant {
            user: Rc::downgrade(user),
            deleted_from_chat: false,
        });
        self.last_read.set(user, 0);
    }

    /// Accoda un messaggio. Non tocca gli indici di lettura: per il
    /// mittente ci pensa il flusso di invio in `ChatSystem`.
    pub fn add_message(&mut self, message: MessageRef) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[MessageRef] {
        &self.messages
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn find_participant(&self, user: &UserRef) -> Option<&Participant> {
        self.participants.iter().find(|participant| {
            participant
                .user
                .upgrade()
                .map_or(false, |live| Rc::ptr_eq(&live, user))
        })
    }

    /// Marca il partecipante come rimosso dalla chat
    pub fn set_deleted_from_chat(&mut self, user: &UserRef) -> ChatResult<()> {
        let found = self.participants.iter_mut().find(|participant| {
            participant
                .user
                .upgrade()
                .map_or(false, |live| Rc::ptr_eq(&live, user))
        });
        match found {
            Some(participant) => {
                participant.deleted_from_chat = true;
                Ok(())
            }
            None => Err(ChatError::ParticipantNotFound),
        }
    }

    /// True se il partecipante è marcato come rimosso, oppure se l'utente
    /// non compare affatto tra i partecipanti: un utente sconosciuto viene
    /// trattato come già rimosso.
    pub fn deleted_from_chat(&self, user: &UserRef) -> bool {
        self.find_participant(user)
            .map_or(true, Participant::deleted_from_chat)
    }

    /// Indice dell'ultimo messaggio letto; 0 se mai impostato
    pub fn last_read_index(&self, user: &UserRef) -> usize {
        self.last_read.get(user).copied().unwrap_or(0)
    }

    /// Aggiorna l'indice di lettura. Nessun vincolo rispetto al numero di
    /// messaggi presenti: un valore pari al totale significa "tutto letto".
    pub fn update_last_read_index(&mut self, user: &UserRef, index: usize) {
        self.last_read.set(user, index);
    }

    /// Messaggi non ancora letti dall'utente
    pub fn unread_count(&self, user: &UserRef) -> usize {
        self.messages.len().saturating_sub(self.last_read_index(user))
    }

    /// Proietta i messaggi, in ordine, dal punto di vista di `viewer`
    pub fn render_for(&self, viewer: &UserRef) -> Vec<MessageView> {
        self.messages
            .iter()
            .map(|message| {
                let sender = message.sender().upgrade();
                let direction = match &sender {
                    Some(live) if Rc::ptr_eq(live, viewer) => Direction::Outgoing,
                    _ => Direction::Incoming,
                };
                MessageView {
                    direction,
                    sender_name: sender
                        .as_ref()
                        .map(|live| live.borrow().display_name().to_string()),
                    sender_login: sender
                        .as_ref()
                        .map(|live| live.borrow().login().to_string()),
                    timestamp: message.timestamp().to_string(),
                    message_id: message.message_id(),
                    content: message.content().to_vec(),
                }
            })
            .collect()
    }
}
