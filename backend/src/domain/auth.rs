//! Authentication inputs: login credentials and account registration.
//!
//! Handlers build these from raw strings before calling a port, so services
//! only ever see validated values. Plain-text passwords are wrapped in
//! [`Zeroizing`] and wiped when dropped.

use std::fmt;

use zeroize::Zeroizing;

use super::{AccountValidationError, DisplayName, EmailAddress, Role};

/// Minimum length for a new password.
pub const PASSWORD_MIN: usize = 8;

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// An account field was invalid.
    #[error(transparent)]
    Account(#[from] AccountValidationError),
    /// The password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// A new password was shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum number of characters.
        min: usize,
    },
}

impl CredentialsValidationError {
    /// Payload field responsible for the failure.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Account(
                AccountValidationError::EmptyDisplayName
                | AccountValidationError::DisplayNameTooLong { .. },
            ) => "name",
            Self::Account(AccountValidationError::InvalidId) => "id",
            Self::Account(_) => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use daybook::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Sam@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "sam@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login inputs.
    ///
    /// The password keeps caller-provided whitespace.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let parsed = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: parsed,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look up the account.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated request to create an account.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
    role: Role,
}

impl Registration {
    /// Validate raw registration inputs. `role` defaults to [`Role::Viewer`].
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Self, CredentialsValidationError> {
        let display_name = DisplayName::new(name)?;
        let address = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            name: display_name,
            email: address,
            password: Zeroizing::new(password.to_owned()),
            role: role.unwrap_or(Role::Viewer),
        })
    }

    /// Display name for the new account.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Email for the new account.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password to hash.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Role for the new account.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Same registration with a different role.
    #[must_use]
    pub fn with_role(self, role: Role) -> Self {
        Self { role, ..self }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Encoded password hash (PHC string) as stored alongside an account.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    #[must_use]
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Encoded representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
