use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::chat::Chat;
use crate::message::Message;
use crate::user::User;

/// Riferimento condiviso a un utente
pub type UserRef = Rc<RefCell<User>>;

/// Riferimento debole a un utente (non lo mantiene in vita)
pub type UserWeak = Weak<RefCell<User>>;

/// Riferimento condiviso a una chat
pub type ChatRef = Rc<RefCell<Chat>>;

/// Riferimento debole a una chat
pub type ChatWeak = Weak<RefCell<Chat>>;

/// Riferimento a un messaggio, immutabile una volta creato
pub type MessageRef = Rc<Message>;

/// Dati anagrafici per la creazione di un utente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub login: String,
    pub display_name: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserData {
    pub fn new(login: String, display_name: String, password_hash: String) -> Self {
        Self {
            login,
            display_name,
            password_hash,
            email: None,
            phone: None,
        }
    }

    pub fn with_contacts(mut self, email: String, phone: String) -> Self {
        self.email = Some(email);
        self.phone = Some(phone);
        self
    }
}

/// Riepilogo di un utente per lo snapshot del sistema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub login: String,
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub chats: usize,
}

/// Riepilogo di una chat per lo snapshot del sistema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: u64,
    pub participants: Vec<String>,
    pub messages: usize,
}

/// Snapshot serializzabile dello stato corrente (comando /dump)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub users: Vec<UserSummary>,
    pub chats: Vec<ChatSummary>,
}

/// Data e ora correnti nel formato usato per i messaggi
pub fn current_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d, %H:%M:%S").to_string()
}
