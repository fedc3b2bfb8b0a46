use serde::{Deserialize, Serialize};

use crate::common::UserWeak;

/// Contenuto di un messaggio. Per ora solo testo; immagini e file sono
/// varianti riservate che vengono mostrate con il loro payload grezzo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    Image(String),
    File(String),
}

impl MessageContent {
    /// Payload grezzo del contenuto, per la visualizzazione
    pub fn payload(&self) -> &str {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Image(image) => image,
            MessageContent::File(file_name) => file_name,
        }
    }
}

/// Messaggio immutabile: lista ordinata di contenuti, mittente (riferimento
/// debole: il messaggio sopravvive alla cancellazione del mittente), orario
/// e id univoco a livello di sistema.
#[derive(Debug)]
pub struct Message {
    message_id: u64,
    content: Vec<MessageContent>,
    sender: UserWeak,
    timestamp: String,
}

impl Message {
    pub fn new(
        message_id: u64,
        content: Vec<MessageContent>,
        sender: UserWeak,
        timestamp: String,
    ) -> Self {
        Self {
            message_id,
            content,
            sender,
            timestamp,
        }
    }

    pub fn message_id(&self) -> u64 {
        self.message_id
    }

    pub fn content(&self) -> &[MessageContent] {
        &self.content
    }

    pub fn sender(&self) -> &UserWeak {
        &self.sender
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
