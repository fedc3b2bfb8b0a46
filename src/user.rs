use std::cell::RefCell;
use std::rc::Rc;

use crate::common::{ChatRef, ChatWeak, UserData, UserRef, UserWeak};

/// Lista delle chat a cui un utente partecipa. I riferimenti sono deboli:
/// la lista non mantiene in vita le chat, e le voci ormai morte vengono
/// semplicemente saltate in lettura.
#[derive(Debug, Default)]
pub struct UserChatList {
    owner: UserWeak,
    chats: Vec<ChatWeak>,
}

impl UserChatList {
    /// Proprietario della lista
    pub fn owner(&self) -> UserWeak {
        self.owner.clone()
    }

    /// Accoda una chat alla lista
    pub fn add_chat(&mut self, chat: &ChatRef) {
        self.chats.push(Rc::downgrade(chat));
    }

    /// Rimuove una chat confrontando per identità, non per valore
    pub fn remove_chat(&mut self, chat: &ChatRef) {
        self.chats.retain(|stored| match stored.upgrade() {
            Some(live) => !Rc::ptr_eq(&live, chat),
            None => true,
        });
    }

    /// Chat ancora esistenti, nell'ordine di inserimento
    pub fn chats(&self) -> Vec<ChatRef> {
        self.chats.iter().filter_map(|weak| weak.upgrade()).collect()
    }
}

/// Utente del sistema. Il login è immutabile dopo la registrazione;
/// nome visualizzato, hash della password e recapiti si possono cambiare.
/// L'identità è quella dell'oggetto (confronti con `Rc::ptr_eq`), non
/// quella della stringa di login.
#[derive(Debug)]
pub struct User {
    login: String,
    display_name: String,
    password_hash: String,
    email: Option<String>,
    phone: Option<String>,
    chat_list: UserChatList,
}

impl User {
    /// Crea l'utente e collega la sua lista chat al proprietario
    pub fn create(data: UserData) -> UserRef {
        let user = Rc::new(RefCell::new(User {
            login: data.login,
            display_name: data.display_name,
            password_hash: data.password_hash,
            email: data.email,
            phone: data.phone,
            chat_list: UserChatList::default(),
        }));
        let weak = Rc::downgrade(&user);
        user.borrow_mut().chat_list.owner = weak;
        user
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, display_name: String) {
        self.display_name = display_name;
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
    }

    pub fn check_login(&self, login: &str) -> bool {
        self.login == login
    }

    pub fn chat_list(&self) -> &UserChatList {
        &self.chat_list
    }

    pub fn chat_list_mut(&mut self) -> &mut UserChatList {
        &mut self.chat_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Chat;

    fn test_user(login: &str) -> UserRef {
        User::create(UserData::new(login.into(), login.to_uppercase(), "hash".into()))
    }

    fn empty_chat() -> ChatRef {
        Rc::new(RefCell::new(Chat::new()))
    }

    #[test]
    fn test_chat_list_owner_is_wired() {
        let user = test_user("mario");
        let owner = user.borrow().chat_list().owner();
        assert!(Rc::ptr_eq(&owner.upgrade().unwrap(), &user));
    }

    #[test]
    fn test_chat_list_add_and_remove_by_identity() {
        let user = test_user("mario");
        let first = empty_chat();
        let second = empty_chat();

        user.borrow_mut().chat_list_mut().add_chat(&first);
        user.borrow_mut().chat_list_mut().add_chat(&second);
        assert_eq!(user.borrow().chat_list().chats().len(), 2);

        user.borrow_mut().chat_list_mut().remove_chat(&first);
        let remaining = user.borrow().chat_list().chats();
        assert_eq!(remaining.len(), 1);
        assert!(Rc::ptr_eq(&remaining[0], &second));
    }

    #[test]
    fn test_chat_list_skips_dropped_chats() {
        let user = test_user("mario");
        let chat = empty_chat();
        user.borrow_mut().chat_list_mut().add_chat(&chat);
        drop(chat);
        assert!(user.borrow().chat_list().chats().is_empty());
    }

    #[test]
    fn test_profile_fields() {
        let user = User::create(
            UserData::new("mario".into(), "Mario".into(), "hash".into())
                .with_contacts("mario@example.com".into(), "+39111".into()),
        );
        assert!(user.borrow().check_login("mario"));
        assert!(!user.borrow().check_login("maria"));
        assert_eq!(user.borrow().email(), Some("mario@example.com"));

        user.borrow_mut().set_display_name("Super Mario".into());
        assert_eq!(user.borrow().display_name(), "Super Mario");
    }
}
