//! Login and registration panel.

use relab_core::{DigitString, Email, EmailError, Registration, UserProfile};
use thiserror::Error;
use tracing::{info, instrument};

use super::cart::CartPanel;
use crate::api::ApiClient;
use crate::error::Result;
use crate::session::SessionContext;

const REGISTERED_NOTICE: &str = "Cadastro realizado! Faça login.";

/// Validation failures caught before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("As senhas não coincidem!")]
    PasswordMismatch,

    #[error("E-mail inválido: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Campo obrigatório: {0}")]
    MissingField(&'static str),
}

/// Which form the panel shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

// =============================================================================
// Forms
// =============================================================================

/// Login form fields.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns `FormError` if the email is malformed or the password empty.
    pub fn validate(&self) -> std::result::Result<Email, FormError> {
        let email = Email::parse(&self.email)?;
        if self.password.is_empty() {
            return Err(FormError::MissingField("password"));
        }
        Ok(email)
    }
}

/// Registration form fields.
///
/// CPF and phone keep only digits, at most eleven, as they are typed.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    cpf: DigitString,
    phone: DigitString,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterForm {
    pub fn set_cpf(&mut self, input: &str) {
        self.cpf = DigitString::normalize(input);
    }

    pub fn set_phone(&mut self, input: &str) {
        self.phone = DigitString::normalize(input);
    }

    #[must_use]
    pub const fn cpf(&self) -> &DigitString {
        &self.cpf
    }

    #[must_use]
    pub const fn phone(&self) -> &DigitString {
        &self.phone
    }

    /// Build the request body. The password check runs first.
    ///
    /// # Errors
    ///
    /// Returns `FormError::PasswordMismatch` when the confirmation differs,
    /// otherwise the first missing or malformed field.
    pub fn validate(&self) -> std::result::Result<Registration, FormError> {
        if self.password != self.password_confirm {
            return Err(FormError::PasswordMismatch);
        }

        let required = [
            ("username", &self.username),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("password", &self.password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(FormError::MissingField(*field));
        }
        let email = Email::parse(&self.email)?;
        if self.cpf.is_empty() {
            return Err(FormError::MissingField("cpf"));
        }
        if self.phone.is_empty() {
            return Err(FormError::MissingField("telefone"));
        }

        Ok(Registration {
            username: self.username.trim().to_owned(),
            email,
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            cpf: self.cpf.clone(),
            phone: self.phone.clone(),
        })
    }

    fn clear_passwords(&mut self) {
        self.password.clear();
        self.password_confirm.clear();
    }
}

// =============================================================================
// AuthPanel
// =============================================================================

/// Modal with the login and registration forms.
#[derive(Debug)]
pub struct AuthPanel {
    client: ApiClient,
    session: SessionContext,
    mode: AuthMode,
    error: Option<String>,
    notice: Option<&'static str>,
    pub login: LoginForm,
    pub register: RegisterForm,
}

impl AuthPanel {
    #[must_use]
    pub fn new(client: ApiClient, session: SessionContext) -> Self {
        Self {
            client,
            session,
            mode: AuthMode::default(),
            error: None,
            notice: None,
            login: LoginForm::default(),
            register: RegisterForm::default(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Switch forms; any shown error goes away.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
    }

    /// Message from the last failed submit, shown above the form.
    ///
    /// Registration failures list one `field: messages` line per field.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation from the last successful registration.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Log in with the login form, then load the user's cart.
    ///
    /// A failed cart load does not fail the login; the cart panel shows its
    /// own banner.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error, also kept in [`Self::error`].
    #[instrument(skip_all)]
    pub async fn submit_login(&mut self, cart: &mut CartPanel) -> Result<Option<UserProfile>> {
        self.error = None;
        let result = self.login().await;
        match result {
            Ok(user) => {
                self.login.password.clear();
                // Failure is already on the cart panel's banner.
                let _ = cart.refresh().await;
                Ok(user)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create an account with the registration form.
    ///
    /// On success the panel switches to login mode with the email filled in
    /// and both password fields cleared. The new user is not logged in.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error, also kept in [`Self::error`].
    #[instrument(skip_all)]
    pub async fn submit_register(&mut self) -> Result<UserProfile> {
        self.error = None;
        self.notice = None;
        let result = self.register().await;
        match result {
            Ok(user) => {
                info!(user_id = %user.id, "Registration complete");
                self.login.email = self.register.email.trim().to_owned();
                self.login.password.clear();
                self.register.clear_passwords();
                self.mode = AuthMode::Login;
                self.notice = Some(REGISTERED_NOTICE);
                Ok(user)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn login(&self) -> Result<Option<UserProfile>> {
        let email = self.login.validate()?;
        Ok(self
            .session
            .login(&self.client, &email, &self.login.password)
            .await?)
    }

    async fn register(&self) -> Result<UserProfile> {
        let registration = self.register.validate()?;
        Ok(self.client.auth().register(&registration).await?)
    }
}
