use std::io::{self, Write};
use std::rc::Rc;

use messaggero::auth;
use messaggero::chat::{Direction, MessageView};
use messaggero::common::{ChatRef, UserRef};
use messaggero::message::MessageContent;
use messaggero::seed;
use messaggero::system::ChatSystem;

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

fn main() {
    env_logger::init();

    let mut system = ChatSystem::new();
    if let Err(e) = seed::seed_demo_data(&mut system) {
        eprintln!("❌ Failed to seed demo data: {}", e);
        return;
    }

    show_welcome();

    loop {
        println!();
        println!("1. Login");
        println!("2. Register");
        println!("0. Exit");
        match read_line("> ").as_str() {
            "1" => {
                if login_menu(&mut system) {
                    home_menu(&mut system);
                    system.set_active_user(None);
                }
            }
            "2" => registration_menu(&mut system),
            "0" => break,
            _ => println!("❌ Unknown choice"),
        }
    }

    println!("👋 Goodbye!");
}

fn show_welcome() {
    println!("🦀 Welcome to Messaggero!");
    println!("=========================");
    println!(
        "Demo users: {} (password \"{}\")",
        seed::DEMO_USERS
            .iter()
            .map(|(login, _)| *login)
            .collect::<Vec<_>>()
            .join(", "),
        seed::DEMO_PASSWORD
    );
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return "0".to_string();
    }
    input.trim().to_string()
}

/// Richiesta con ritento: ripropone il prompt finché la validazione non
/// passa; "0" annulla.
fn prompt_validated(prompt: &str, validate: impl Fn(&str) -> bool) -> Option<String> {
    loop {
        let input = read_line(prompt);
        if input == "0" {
            return None;
        }
        if validate(&input) {
            return Some(input);
        }
    }
}

fn registration_menu(system: &mut ChatSystem) {
    println!("📝 New user registration (0 to cancel)");

    let login = match prompt_validated("Login: ", |input| match auth::validate_login(input) {
        Ok(()) => true,
        Err(e) => {
            println!("❌ {}. Try again.", e);
            false
        }
    }) {
        Some(login) => login,
        None => return,
    };

    if system.login_exists(&login) {
        println!("❌ Login '{}' is already taken", login);
        return;
    }

    let password = match prompt_validated("Password: ", |input| {
        match auth::validate_password(input) {
            Ok(()) => true,
            Err(e) => {
                println!("❌ {}. Try again.", e);
                false
            }
        }
    }) {
        Some(password) => password,
        None => return,
    };

    let name = match prompt_validated("Display name: ", |input| {
        match auth::validate_display_name(input) {
            Ok(()) => true,
            Err(e) => {
                println!("❌ {}. Try again.", e);
                false
            }
        }
    }) {
        Some(name) => name,
        None => return,
    };

    match auth::register_user(system, &login, &password, &name) {
        Ok(user) => println!(
            "✅ Registered '{}' ({})",
            user.borrow().login(),
            user.borrow().display_name()
        ),
        Err(e) => println!("❌ {}", e),
    }
}

fn login_menu(system: &mut ChatSystem) -> bool {
    loop {
        let login = read_line("Login (0 to cancel): ");
        if login == "0" {
            return false;
        }
        let password = read_line("Password (0 to cancel): ");
        if password == "0" {
            return false;
        }
        match auth::login(system, &login, &password) {
            Ok(user) => {
                println!("✅ Welcome back, {}!", user.borrow().display_name());
                return true;
            }
            Err(e) => println!("❌ {}. Try again.", e),
        }
    }
}

fn home_menu(system: &mut ChatSystem) {
    loop {
        println!();
        println!("1. My chats");
        println!("2. New chat");
        println!("3. Find users");
        println!("4. My profile");
        println!("5. Dump state");
        println!("0. Logout");
        match read_line("> ").as_str() {
            "1" => chat_list_menu(system),
            "2" => new_chat_menu(system),
            "3" => search_menu(system),
            "4" => profile_menu(system),
            "5" => dump_state(system),
            "0" => return,
            _ => println!("❌ Unknown choice"),
        }
    }
}

fn active_user(system: &ChatSystem) -> UserRef {
    // i menu interni girano solo con una sessione aperta
    system.active_user().cloned().unwrap()
}

fn chat_title(chat: &ChatRef, me: &UserRef) -> String {
    let chat = chat.borrow();
    let names: Vec<String> = chat
        .participants()
        .iter()
        .filter_map(|participant| participant.user().upgrade())
        .filter(|user| !Rc::ptr_eq(user, me))
        .map(|user| user.borrow().display_name().to_string())
        .collect();
    if names.is_empty() {
        "(empty chat)".to_string()
    } else {
        names.join(", ")
    }
}

fn chat_list_menu(system: &mut ChatSystem) {
    let me = active_user(system);
    loop {
        let chats = me.borrow().chat_list().chats();
        if chats.is_empty() {
            println!("📋 You have no chats yet.");
            return;
        }
        println!("📋 Your chats:");
        for (position, chat) in chats.iter().enumerate() {
            let unread = chat.borrow().unread_count(&me);
            let id = chat.borrow().chat_id().unwrap_or(0);
            println!(
                "{}. [chat {}] {} — {} unread",
                position + 1,
                id,
                chat_title(chat, &me),
                unread
            );
        }
        let choice = read_line("Open chat number (0 to go back): ");
        if choice == "0" {
            return;
        }
        match choice.parse::<usize>() {
            Ok(number) if number >= 1 && number <= chats.len() => {
                open_chat(system, &chats[number - 1]);
            }
            _ => println!("❌ Invalid chat number"),
        }
    }
}

fn print_message(view: &MessageView) {
    let sender = view
        .sender_name
        .clone()
        .unwrap_or_else(|| "deleted user".to_string());
    let color = match view.direction {
        Direction::Outgoing => GREEN,
        Direction::Incoming => CYAN,
    };
    for content in &view.content {
        println!(
            "{}[{}] #{} {}: {}{}",
            color,
            view.timestamp,
            view.message_id,
            sender,
            content.payload(),
            RESET
        );
    }
}

fn open_chat(system: &mut ChatSystem, chat: &ChatRef) {
    let me = active_user(system);

    let views = chat.borrow().render_for(&me);
    if views.is_empty() {
        println!("💬 No messages yet.");
    } else {
        for view in &views {
            print_message(view);
        }
    }

    // aprire la chat significa aver letto tutto quello che c'è
    let total = chat.borrow().messages().len();
    chat.borrow_mut().update_last_read_index(&me, total);

    loop {
        let input = read_line("Message (0 to go back): ");
        if input == "0" {
            return;
        }
        if input.is_empty() {
            println!("❌ Message must not be empty");
            continue;
        }
        let posted = system.post_message(
            chat,
            &Rc::downgrade(&me),
            vec![MessageContent::Text(input)],
        );
        match posted {
            Ok(message) => {
                if let Some(view) = chat.borrow().render_for(&me).into_iter().find(|view| {
                    view.message_id == message.message_id()
                }) {
                    print_message(&view);
                }
            }
            Err(e) => println!("❌ {}", e),
        }
    }
}

fn new_chat_menu(system: &mut ChatSystem) {
    let me = active_user(system);
    let (others, _) = system.user_list(false);
    if others.is_empty() {
        println!("❌ Nobody else to chat with");
        return;
    }
    println!("👥 Pick participants (numbers separated by spaces, 0 to cancel):");
    for (number, user) in &others {
        let user = user.borrow();
        println!("{}. {} ({})", number, user.display_name(), user.login());
    }

    let input = read_line("> ");
    if input == "0" {
        return;
    }

    let mut participants = vec![me.clone()];
    for token in input.split_whitespace() {
        match token.parse::<usize>() {
            Ok(number) => match others.iter().find(|(position, _)| *position == number) {
                Some((_, user)) => {
                    if !participants.iter().any(|existing| Rc::ptr_eq(existing, user)) {
                        participants.push(user.clone());
                    }
                }
                None => {
                    println!("❌ No user with number {}", number);
                    return;
                }
            },
            Err(_) => {
                println!("❌ '{}' is not a number", token);
                return;
            }
        }
    }
    if participants.len() < 2 {
        println!("❌ Pick at least one other participant");
        return;
    }

    match system.create_chat(&participants) {
        Ok(chat) => {
            println!(
                "✅ Chat {} created with {}",
                chat.borrow().chat_id().unwrap_or(0),
                chat_title(&chat, &me)
            );
            open_chat(system, &chat);
        }
        Err(e) => println!("❌ {}", e),
    }
}

fn search_menu(system: &ChatSystem) {
    let text = read_line("🔍 Search text (login or name): ");
    if text.is_empty() {
        return;
    }
    let matches = system.find_user_by_text_part(&text);
    if matches.is_empty() {
        println!("No users found.");
        return;
    }
    for user in matches {
        let user = user.borrow();
        println!("• {} ({})", user.display_name(), user.login());
    }
}

fn profile_menu(system: &mut ChatSystem) {
    let me = active_user(system);
    loop {
        {
            let user = me.borrow();
            println!();
            println!("👤 Login: {}", user.login());
            println!("   Name:  {}", user.display_name());
            println!("   Email: {}", user.email().unwrap_or("-"));
            println!("   Phone: {}", user.phone().unwrap_or("-"));
        }
        println!("1. Change display name");
        println!("2. Change password");
        println!("0. Back");
        match read_line("> ").as_str() {
            "1" => {
                if let Some(name) = prompt_validated("New name: ", |input| {
                    match auth::validate_display_name(input) {
                        Ok(()) => true,
                        Err(e) => {
                            println!("❌ {}. Try again.", e);
                            false
                        }
                    }
                }) {
                    me.borrow_mut().set_display_name(name);
                    println!("✅ Name updated");
                }
            }
            "2" => {
                if let Some(password) = prompt_validated("New password: ", |input| {
                    match auth::validate_password(input) {
                        Ok(()) => true,
                        Err(e) => {
                            println!("❌ {}. Try again.", e);
                            false
                        }
                    }
                }) {
                    match auth::hash_password(&password) {
                        Ok(hash) => {
                            me.borrow_mut().set_password_hash(hash);
                            println!("✅ Password updated");
                        }
                        Err(e) => println!("❌ {}", e),
                    }
                }
            }
            "0" => return,
            _ => println!("❌ Unknown choice"),
        }
    }
}

fn dump_state(system: &ChatSystem) {
    match serde_json::to_string_pretty(&system.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("❌ {}", e),
    }
}
