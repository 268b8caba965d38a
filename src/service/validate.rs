// Field rules shared by registration and login
use super::forms::{LoginForm, RegisterForm};
use crate::account::Account;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// A field counts as present when it was submitted and is not blank.
pub fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.trim().is_empty())
}

/// Age must be made only of ASCII digits, no sign, no surrounding blanks.
pub fn valid_age(age: &str) -> Option<u32> {
    if Regex::new(r"^[0-9]+$").is_ok_and(|re| re.is_match(age)) {
        age.parse::<u32>().ok()
    } else {
        None
    }
}

fn secret(field: Option<&SecretString>) -> Option<&str> {
    present(field.map(|value| value.expose_secret()))
}

/// Turn a registration form into the account to persist.
pub fn registration(form: &RegisterForm) -> Result<Account, &'static str> {
    let username = present(form.username.as_deref()).ok_or("missing username")?;
    let password = secret(form.password.as_ref()).ok_or("missing password")?;
    let nickname = present(form.nickname.as_deref()).ok_or("missing nickname")?;
    let age = present(form.age.as_deref()).ok_or("missing age")?;
    let age = valid_age(age).ok_or("age is not a number")?;

    Ok(Account::new(
        username.to_string(),
        password.to_string(),
        nickname.to_string(),
        age,
    ))
}

/// Extract the username and password to check from a login form.
pub fn login(form: &LoginForm) -> Result<(&str, &str), &'static str> {
    let username = present(form.username.as_deref()).ok_or("missing username")?;
    let password = secret(form.password.as_ref()).ok_or("missing password")?;
    Ok((username, password))
}
