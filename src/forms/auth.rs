use validator::Validate;

use super::{blank_to_none, Form, FormError};
use crate::api::schema::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, SocialLinks, UpdateProfileRequest,
};

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Form for LoginForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("email", self.email.as_str(), "Email is required"),
            ("password", self.password.as_str(), "Password is required"),
        ]
    }
}

impl LoginForm {
    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    pub name: String,
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub confirm_password: String,
}

impl Form for RegisterForm {
    const FIELDS: &'static [&'static str] =
        &["name", "username", "email", "password", "confirm_password"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("name", self.name.as_str(), "Name is required"),
            ("username", self.username.as_str(), "Username is required"),
            ("email", self.email.as_str(), "Email is required"),
            ("password", self.password.as_str(), "Password is required"),
        ]
    }

    fn extra_checks(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            errors.push(FormError::new(
                "username",
                "Username may only contain letters, numbers, '-' and '_'",
            ));
        }
        if self.password != self.confirm_password {
            errors.push(FormError::new("confirm_password", "Passwords do not match"));
        }
        errors
    }
}

impl RegisterForm {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

impl Form for ForgotPasswordForm {
    const FIELDS: &'static [&'static str] = &["email"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("email", self.email.as_str(), "Email is required")]
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileForm {
    #[validate(length(max = 60, message = "Name must be 60 characters or less"))]
    pub name: String,
    #[validate(length(max = 500, message = "Bio must be 500 characters or less"))]
    pub bio: Option<String>,
    pub location: Option<String>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

impl Form for ProfileForm {
    const FIELDS: &'static [&'static str] = &["name", "bio", "website"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("name", self.name.as_str(), "Name is required")]
    }
}

impl ProfileForm {
    pub fn to_request(&self) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: Some(self.name.trim().to_string()),
            bio: blank_to_none(&self.bio),
            location: blank_to_none(&self.location),
            website: blank_to_none(&self.website),
            avatar: None,
            social_links: Some(SocialLinks {
                github: blank_to_none(&self.github),
                twitter: blank_to_none(&self.twitter),
                linkedin: blank_to_none(&self.linkedin),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct ChangePasswordForm {
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    pub confirm_password: String,
}

impl Form for ChangePasswordForm {
    const FIELDS: &'static [&'static str] = &["current_password", "new_password", "confirm_password"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("current_password", self.current_password.as_str(), "Current password is required")]
    }

    fn extra_checks(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        if self.new_password == self.current_password {
            errors.push(FormError::new(
                "new_password",
                "New password must differ from the current one",
            ));
        }
        if self.new_password != self.confirm_password {
            errors.push(FormError::new("confirm_password", "Passwords do not match"));
        }
        errors
    }
}

impl ChangePasswordForm {
    pub fn to_request(&self) -> ChangePasswordRequest {
        ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Grace Hopper".into(),
            username: "grace_h".into(),
            email: "grace@example.com".into(),
            password: "cobol1959".into(),
            confirm_password: "cobol1959".into(),
        }
    }

    #[test]
    fn test_login_form_rules() {
        let ok = LoginForm {
            email: "dev@devhub.io".into(),
            password: "secret".into(),
        };
        assert!(ok.check().is_ok());

        let bad_email = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        assert_eq!(bad_email.check().unwrap_err().message, "Please enter a valid email address");

        let short = LoginForm {
            email: "dev@devhub.io".into(),
            password: "12345".into(),
        };
        assert_eq!(short.check().unwrap_err().field, "password");
    }

    #[test]
    fn test_register_form_requires_matching_passwords() {
        assert!(register_form().check().is_ok());

        let mismatch = RegisterForm {
            confirm_password: "cobol1960".into(),
            ..register_form()
        };
        let err = mismatch.check().unwrap_err();
        assert_eq!(err.field, "confirm_password");
    }

    #[test]
    fn test_register_form_rejects_odd_usernames() {
        let form = RegisterForm {
            username: "grace hopper".into(),
            ..register_form()
        };
        assert_eq!(form.check().unwrap_err().field, "username");
    }

    #[test]
    fn test_register_form_rejects_blank_name() {
        let form = RegisterForm {
            name: "   ".into(),
            ..register_form()
        };
        assert_eq!(form.check().unwrap_err().message, "Name is required");
    }

    #[test]
    fn test_profile_form_validates_website() {
        let form = ProfileForm {
            name: "Linus".into(),
            website: Some("not a url".into()),
            ..ProfileForm::default()
        };
        assert_eq!(form.check().unwrap_err().field, "website");

        let form = ProfileForm {
            name: "Linus".into(),
            website: Some("https://kernel.org".into()),
            github: Some("  ".into()),
            ..ProfileForm::default()
        };
        assert!(form.check().is_ok());
        let request = form.to_request();
        assert_eq!(request.social_links.unwrap().github, None);
    }

    #[test]
    fn test_change_password_form() {
        let form = ChangePasswordForm {
            current_password: "old-secret".into(),
            new_password: "old-secret".into(),
            confirm_password: "old-secret".into(),
        };
        assert_eq!(form.check().unwrap_err().field, "new_password");
    }
}
