use thiserror::Error;

/// Errori del sistema di messaggistica
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Chat {0} not found")]
    ChatNotFound(u64),

    #[error("User is not in the participant list")]
    ParticipantNotFound,

    #[error("Login '{0}' is already taken")]
    LoginTaken(String),

    #[error("Chat already has an id assigned")]
    ChatAlreadyRegistered,

    #[error("Message sender is gone, message not created")]
    SenderUnavailable,

    #[error("Invalid password")]
    InvalidPassword,

    // Errori di validazione dell'input (registrazione)
    #[error("Input must not be empty")]
    EmptyInput,

    #[error("Input must be between {min} and {max} characters")]
    BadLength { min: usize, max: usize },

    #[error("Only ASCII letters and digits are allowed")]
    InvalidCharacter,

    #[error("Password needs at least one capital letter")]
    MissingUppercase,

    #[error("Password needs at least one digit")]
    MissingDigit,

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Risultato delle operazioni del sistema
pub type ChatResult<T> = Result<T, ChatError>;
