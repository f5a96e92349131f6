//! Account commands.
//!
//! Authentication is mocked: any non-blank username and password sign in.

use secrecy::SecretString;

use shopfront_storefront::{AppError, Result, Storefront};

/// Sign in.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the username or password is blank.
#[allow(clippy::print_stdout)]
pub fn login(shop: &mut Storefront, username: &str, password: String) -> Result<()> {
    let password = SecretString::from(password);
    if !shop.auth_mut().login(username, &password) {
        return Err(AppError::BadRequest(
            "username and password are required".to_string(),
        ));
    }
    println!("Signed in as {username}");
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for blank credentials or a malformed email.
#[allow(clippy::print_stdout)]
pub fn register(shop: &mut Storefront, username: &str, email: &str, password: String) -> Result<()> {
    let password = SecretString::from(password);
    if !shop.auth_mut().register(username, email, &password) {
        return Err(AppError::BadRequest(
            "a username, password and valid email are required".to_string(),
        ));
    }
    println!("Registered and signed in as {username}");
    Ok(())
}

/// Sign out.
#[allow(clippy::print_stdout)]
pub fn logout(shop: &mut Storefront) {
    shop.auth_mut().logout();
    println!("Signed out");
}

/// Print the signed-in user.
#[allow(clippy::print_stdout)]
pub fn whoami(shop: &Storefront) {
    match shop.auth().current_user() {
        Some(user) => println!("{} <{}>", user.username, user.email),
        None => println!("Not signed in"),
    }
}
