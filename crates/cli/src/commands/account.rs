//! Account commands: login, register, logout, whoami.

#![allow(clippy::print_stdout)]

use relab_storefront::Result;
use relab_storefront::views::{AuthMode, AuthPanel, CartPanel, LoginForm, RegisterForm};

use super::App;

/// Raw registration input, validated by the register form.
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
}

/// Log in and persist the session.
pub async fn login(app: &App, email: String, password: String) -> Result<()> {
    let mut panel = AuthPanel::new(app.client.clone(), app.session.clone());
    let mut cart = CartPanel::new(app.client.clone(), app.session.clone());
    panel.login = LoginForm { email, password };

    let user = panel.submit_login(&mut cart).await?;
    match user {
        Some(user) => println!("Logged in as {} <{}>", user.display_name(), user.email),
        None => println!("Logged in"),
    }
    if let Some(cart) = cart.cart() {
        println!("Cart: {} item(s), {}", cart.item_count, cart.display_total());
    }
    Ok(())
}

/// Create an account. The user still has to log in afterwards.
pub async fn register(app: &App, input: Registration) -> Result<()> {
    let mut panel = AuthPanel::new(app.client.clone(), app.session.clone());
    panel.switch_mode(AuthMode::Register);

    let mut form = RegisterForm::default();
    form.username = input.username;
    form.email = input.email;
    form.first_name = input.first_name;
    form.last_name = input.last_name;
    form.password = input.password;
    form.password_confirm = input.password_confirm;
    form.set_cpf(&input.cpf);
    form.set_phone(&input.phone);
    panel.register = form;

    let user = panel.submit_register().await?;
    println!("Account {} created for {}", user.username, user.email);
    if let Some(notice) = panel.notice() {
        println!("{notice}");
    }
    Ok(())
}

/// Forget the stored session. The backend is not contacted.
pub fn logout(app: &App) -> Result<()> {
    app.session.logout()?;
    println!("Logged out");
    Ok(())
}

/// Print the stored user, if any.
pub fn whoami(app: &App) {
    if !app.session.is_authenticated() {
        println!("Not logged in");
        return;
    }
    match app.session.user() {
        Some(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("username: {}", user.username);
        }
        None => println!("Logged in (no profile stored)"),
    }
    println!("session file: {}", app.config.session_file.display());
}
