//! Dati dimostrativi caricati a ogni avvio: sette utenti e due chat
//! (una a due, una di gruppo). Lo stato non è persistente, quindi la
//! fixture viene rigenerata a ogni esecuzione.

use std::rc::Rc;

use log::info;

use crate::auth;
use crate::common::{UserData, UserRef};
use crate::error::ChatResult;
use crate::message::MessageContent;
use crate::system::ChatSystem;
use crate::user::User;

/// Password di tutti gli utenti dimostrativi
pub const DEMO_PASSWORD: &str = "Demo1";

/// Coppie (login, nome visualizzato) degli utenti dimostrativi
pub const DEMO_USERS: [(&str, &str); 7] = [
    ("a", "Sasha"),
    ("e", "Elena"),
    ("s", "Sergei"),
    ("v", "Vitaliy"),
    ("m", "Mariya"),
    ("ver", "Vera"),
    ("y", "Yakov"),
];

fn text(message: &str) -> Vec<MessageContent> {
    vec![MessageContent::Text(message.to_string())]
}

/// Popola il sistema con gli utenti e le chat di prova
pub fn seed_demo_data(system: &mut ChatSystem) -> ChatResult<Vec<UserRef>> {
    // un solo hash: la password dimostrativa è identica per tutti
    let demo_hash = auth::hash_password(DEMO_PASSWORD)?;

    let users: Vec<UserRef> = DEMO_USERS
        .iter()
        .map(|(login, name)| {
            User::create(
                UserData::new(login.to_string(), name.to_string(), demo_hash.clone())
                    .with_contacts(format!("{}@example.com", login), "+111".to_string()),
            )
        })
        .collect();
    for user in &users {
        system.add_user(user.clone())?;
    }

    let sasha = &users[0];
    let elena = &users[1];
    let sergei = &users[2];
    let mariya = &users[4];
    let yakov = &users[6];

    // Chat uno-a-uno: Elena e Sasha
    let chat = system.create_chat(&[elena.clone(), sasha.clone()])?;
    system.post_message_at(
        &chat,
        &Rc::downgrade(elena),
        text("Hi!"),
        "2025-04-01, 12:00:00".into(),
    )?;
    system.post_message_at(
        &chat,
        &Rc::downgrade(sasha),
        text("Hey! How are you?"),
        "2025-04-01, 12:05:00".into(),
    )?;
    system.post_message_at(
        &chat,
        &Rc::downgrade(elena),
        text("Fine. Coffee later?"),
        "2025-04-01, 12:07:00".into(),
    )?;

    // Chat di gruppo a cinque
    let group = system.create_chat(&[
        elena.clone(),
        sasha.clone(),
        sergei.clone(),
        mariya.clone(),
        yakov.clone(),
    ])?;
    system.post_message_at(
        &group,
        &Rc::downgrade(elena),
        text("Hello everyone!"),
        "2025-04-01, 13:00:00".into(),
    )?;
    system.post_message_at(
        &group,
        &Rc::downgrade(sasha),
        text("Hi Elena!"),
        "2025-04-01, 13:02:00".into(),
    )?;
    system.post_message_at(
        &group,
        &Rc::downgrade(sergei),
        text("Good afternoon."),
        "2025-04-01, 13:10:15".into(),
    )?;
    system.post_message_at(
        &group,
        &Rc::downgrade(elena),
        text("Where are we going?"),
        "2025-04-01, 13:12:09".into(),
    )?;
    system.post_message_at(
        &group,
        &Rc::downgrade(sergei),
        text("To the cinema!"),
        "2025-04-01, 13:33:00".into(),
    )?;

    // Elena ha letto tutto tranne l'ultimo messaggio del gruppo
    let read_up_to = group.borrow().messages().len() - 1;
    group.borrow_mut().update_last_read_index(elena, read_up_to);

    info!(
        "seeded {} demo users and {} chats",
        system.users().len(),
        system.chats().len()
    );
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let mut system = ChatSystem::new();
        let users = seed_demo_data(&mut system).unwrap();

        assert_eq!(users.len(), 7);
        assert_eq!(system.users().len(), 7);
        assert_eq!(system.chats().len(), 2);

        let direct = system.get_chat_by_id(1).unwrap();
        let group = system.get_chat_by_id(2).unwrap();
        assert_eq!(direct.borrow().participants().len(), 2);
        assert_eq!(direct.borrow().messages().len(), 3);
        assert_eq!(group.borrow().participants().len(), 5);
        assert_eq!(group.borrow().messages().len(), 5);
    }

    #[test]
    fn test_seed_read_positions() {
        let mut system = ChatSystem::new();
        let users = seed_demo_data(&mut system).unwrap();
        let sasha = &users[0];
        let elena = &users[1];
        let yakov = &users[6];

        let direct = system.get_chat_by_id(1).unwrap();
        // l'ultimo invio di Elena è il terzo messaggio
        assert_eq!(direct.borrow().last_read_index(elena), 3);
        assert_eq!(direct.borrow().unread_count(elena), 0);
        assert_eq!(direct.borrow().last_read_index(sasha), 2);
        assert_eq!(direct.borrow().unread_count(sasha), 1);

        let group = system.get_chat_by_id(2).unwrap();
        assert_eq!(group.borrow().last_read_index(elena), 4);
        assert_eq!(group.borrow().unread_count(elena), 1);
        // Yakov non ha mai né scritto né letto
        assert_eq!(group.borrow().last_read_index(yakov), 0);
        assert_eq!(group.borrow().unread_count(yakov), 5);
    }

    #[test]
    fn test_demo_users_can_authenticate() {
        let mut system = ChatSystem::new();
        seed_demo_data(&mut system).unwrap();
        let user = auth::login(&mut system, "e", DEMO_PASSWORD).unwrap();
        assert_eq!(user.borrow().display_name(), "Elena");
    }

    #[test]
    fn test_message_ids_span_both_chats() {
        let mut system = ChatSystem::new();
        seed_demo_data(&mut system).unwrap();
        let group = system.get_chat_by_id(2).unwrap();
        // il pool dei message id è unico a livello di sistema
        let ids: Vec<u64> = group
            .borrow()
            .messages()
            .iter()
            .map(|message| message.message_id())
            .collect();
        assert_eq!(ids, vec![4, 5, 6, 7, 8]);
    }
}
