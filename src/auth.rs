use bcrypt::{hash, verify, DEFAULT_COST};

use crate::common::{UserData, UserRef};
use crate::error::{ChatError, ChatResult};
use crate::system::ChatSystem;
use crate::user::User;

// Limiti di lunghezza per i dati di registrazione
pub const LOGIN_MIN: usize = 3;
pub const LOGIN_MAX: usize = 15;
pub const PASSWORD_MIN: usize = 5;
pub const PASSWORD_MAX: usize = 10;
pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 10;

/// Calcola l'hash bcrypt di una password in chiaro. Il modello non vede
/// mai la password: memorizza solo l'hash.
pub fn hash_password(raw: &str) -> ChatResult<String> {
    Ok(hash(raw, DEFAULT_COST)?)
}

/// Verifica una password in chiaro contro l'hash memorizzato
pub fn verify_password(raw: &str, password_hash: &str) -> ChatResult<bool> {
    Ok(verify(raw, password_hash)?)
}

/// Controlli comuni sull'input: non vuoto, solo lettere e cifre ASCII,
/// lunghezza nei limiti; per le password anche una maiuscola e una cifra.
fn check_limits(input: &str, min: usize, max: usize, is_password: bool) -> ChatResult<()> {
    if input.is_empty() {
        return Err(ChatError::EmptyInput);
    }

    let mut has_uppercase = false;
    let mut has_digit = false;
    for ch in input.chars() {
        if !ch.is_ascii_alphanumeric() {
            return Err(ChatError::InvalidCharacter);
        }
        has_uppercase |= ch.is_ascii_uppercase();
        has_digit |= ch.is_ascii_digit();
    }

    let length = input.len();
    if length < min || length > max {
        return Err(ChatError::BadLength { min, max });
    }

    if is_password {
        if !has_uppercase {
            return Err(ChatError::MissingUppercase);
        }
        if !has_digit {
            return Err(ChatError::MissingDigit);
        }
    }
    Ok(())
}

pub fn validate_login(login: &str) -> ChatResult<()> {
    check_limits(login, LOGIN_MIN, LOGIN_MAX, false)
}

pub fn validate_password(password: &str) -> ChatResult<()> {
    check_limits(password, PASSWORD_MIN, PASSWORD_MAX, true)
}

pub fn validate_display_name(name: &str) -> ChatResult<()> {
    check_limits(name, NAME_MIN, NAME_MAX, false)
}

/// Registra un nuovo utente: valida i dati, controlla che il login sia
/// libero, calcola l'hash della password e inserisce l'utente nel sistema.
pub fn register_user(
    system: &mut ChatSystem,
    login: &str,
    password: &str,
    display_name: &str,
) -> ChatResult<UserRef> {
    validate_login(login)?;
    validate_password(password)?;
    validate_display_name(display_name)?;

    // controllo prima dell'inserimento; add_user rifiuta comunque i duplicati
    if system.login_exists(login) {
        return Err(ChatError::LoginTaken(login.to_string()));
    }

    let password_hash = hash_password(password)?;
    let user = User::create(UserData::new(
        login.to_string(),
        display_name.to_string(),
        password_hash,
    ));
    system.add_user(user.clone())?;
    Ok(user)
}

/// Autentica un utente e lo imposta come utente attivo della sessione
pub fn login(system: &mut ChatSystem, login: &str, password: &str) -> ChatResult<UserRef> {
    let user = system
        .find_user_by_login(login)
        .ok_or_else(|| ChatError::UserNotFound(login.to_string()))?;

    let stored_hash = user.borrow().password_hash().to_string();
    if !verify_password(password, &stored_hash)? {
        return Err(ChatError::InvalidPassword);
    }

    system.set_active_user(Some(user.clone()));
    Ok(user)
}
