use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("modal {0:?} is not open")]
    NotOpen(ModalId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Login,
    Signup,
    CreateCrew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Password,
    TextArea { rows: u32 },
}

impl InputKind {
    /// `type` attribute for `<input>`; text areas have none.
    pub fn html_type(self) -> Option<&'static str> {
        match self {
            InputKind::Text => Some("text"),
            InputKind::Email => Some("email"),
            InputKind::Password => Some("password"),
            InputKind::TextArea { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: InputKind,
    pub placeholder: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLink {
    pub prompt: &'static str,
    pub label: &'static str,
    pub opens: ModalKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpec {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    pub submit_label: &'static str,
    pub footer: Option<FormLink>,
}

const fn required(key: &'static str, kind: InputKind, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        kind,
        placeholder,
        required: true,
    }
}

const LOGIN_FORM: FormSpec = FormSpec {
    title: "Join ShoreSquad",
    fields: &[
        required("email", InputKind::Email, "Email"),
        required("password", InputKind::Password, "Password"),
    ],
    submit_label: "Sign In",
    footer: Some(FormLink {
        prompt: "Don't have an account?",
        label: "Sign Up",
        opens: ModalKind::Signup,
    }),
};

const SIGNUP_FORM: FormSpec = FormSpec {
    title: "Create Your ShoreSquad Account",
    fields: &[
        required("name", InputKind::Text, "Full Name"),
        required("email", InputKind::Email, "Email"),
        required("password", InputKind::Password, "Password"),
    ],
    submit_label: "Create Account",
    footer: None,
};

const CREATE_CREW_FORM: FormSpec = FormSpec {
    title: "Create New Crew",
    fields: &[
        required("name", InputKind::Text, "Crew Name"),
        required("description", InputKind::TextArea { rows: 4 }, "Crew Description"),
        required("location", InputKind::Text, "Location (Beach/Area)"),
    ],
    submit_label: "Create Crew",
    footer: None,
};

pub const LOGIN_WELCOME: &str = "Welcome back to ShoreSquad! \u{1F30A}";
pub const SIGNUP_WELCOME: &str = "Welcome to ShoreSquad! Ready to save the ocean? \u{1F30A}";
pub const CREW_CREATED: &str = "\u{1F389} Crew created! Invite your friends to join!";

impl ModalKind {
    pub fn form(self) -> &'static FormSpec {
        match self {
            ModalKind::Login => &LOGIN_FORM,
            ModalKind::Signup => &SIGNUP_FORM,
            ModalKind::CreateCrew => &CREATE_CREW_FORM,
        }
    }
}

pub type FormValues = BTreeMap<&'static str, String>;

/// What a successful submission asks the caller to do. The modal is
/// already closed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    Welcome(&'static str),
    CreateCrew {
        name: String,
        description: String,
        home_beach: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenModal {
    pub id: ModalId,
    pub kind: ModalKind,
}

/// Overlays in opening order. Nothing stops two from stacking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalStack {
    open: Vec<OpenModal>,
    next_id: u64,
}

impl ModalStack {
    pub fn open(&mut self, kind: ModalKind) -> ModalId {
        self.next_id += 1;
        let id = ModalId(self.next_id);
        self.open.push(OpenModal { id, kind });
        id
    }

    pub fn close(&mut self, id: ModalId) -> bool {
        let before = self.open.len();
        self.open.retain(|m| m.id != id);
        self.open.len() != before
    }

    pub fn close_all(&mut self) -> usize {
        let closed = self.open.len();
        self.open.clear();
        closed
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenModal> {
        self.open.iter()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn kind_of(&self, id: ModalId) -> Option<ModalKind> {
        self.open.iter().find(|m| m.id == id).map(|m| m.kind)
    }

    /// Check required fields, close the modal and describe the follow-up.
    /// On error the modal stays open.
    pub fn submit(&mut self, id: ModalId, values: &FormValues) -> Result<ModalOutcome, ModalError> {
        let kind = self.kind_of(id).ok_or(ModalError::NotOpen(id))?;
        validate(kind.form(), values)?;
        self.close(id);
        let field = |key: &str| values.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        Ok(match kind {
            ModalKind::Login => ModalOutcome::Welcome(LOGIN_WELCOME),
            ModalKind::Signup => ModalOutcome::Welcome(SIGNUP_WELCOME),
            ModalKind::CreateCrew => ModalOutcome::CreateCrew {
                name: field("name"),
                description: field("description"),
                home_beach: field("location"),
            },
        })
    }
}

pub fn validate(form: &FormSpec, values: &FormValues) -> Result<(), ModalError> {
    for field in form.fields.iter().filter(|f| f.required) {
        let filled = values
            .get(field.key)
            .is_some_and(|value| !value.trim().is_empty());
        if !filled {
            return Err(ModalError::MissingField(field.key));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> FormValues {
        pairs.iter().map(|&(k, v)| (k, v.to_string())).collect()
    }

    #[test]
    fn escape_closes_every_stacked_modal() {
        let mut stack = ModalStack::default();
        stack.open(ModalKind::Login);
        stack.open(ModalKind::Signup);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.close_all(), 2);
        assert!(stack.is_empty());
    }

    #[test]
    fn login_footer_links_to_signup() {
        let footer = ModalKind::Login.form().footer.unwrap();
        assert_eq!(footer.label, "Sign Up");
        assert_eq!(footer.opens, ModalKind::Signup);
        assert!(ModalKind::Signup.form().footer.is_none());
    }

    #[test]
    fn missing_required_field_keeps_modal_open() {
        let mut stack = ModalStack::default();
        let id = stack.open(ModalKind::Login);
        let result = stack.submit(id, &values(&[("email", "a@b.c"), ("password", "  ")]));
        assert_eq!(result, Err(ModalError::MissingField("password")));
        assert_eq!(stack.kind_of(id), Some(ModalKind::Login));
    }

    #[test]
    fn login_submit_welcomes_and_closes() {
        let mut stack = ModalStack::default();
        let id = stack.open(ModalKind::Login);
        let outcome = stack
            .submit(id, &values(&[("email", "a@b.c"), ("password", "pw")]))
            .unwrap();
        assert_eq!(outcome, ModalOutcome::Welcome(LOGIN_WELCOME));
        assert!(stack.is_empty());
    }

    #[test]
    fn crew_submit_carries_trimmed_fields() {
        let mut stack = ModalStack::default();
        let id = stack.open(ModalKind::CreateCrew);
        let outcome = stack
            .submit(
                id,
                &values(&[
                    ("name", " Reef Rangers "),
                    ("description", "Weekly"),
                    ("location", "Changi"),
                ]),
            )
            .unwrap();
        assert_eq!(
            outcome,
            ModalOutcome::CreateCrew {
                name: "Reef Rangers".into(),
                description: "Weekly".into(),
                home_beach: "Changi".into(),
            }
        );
    }

    #[test]
    fn submitting_a_closed_modal_fails() {
        let mut stack = ModalStack::default();
        let id = stack.open(ModalKind::Signup);
        stack.close(id);
        assert_eq!(
            stack.submit(id, &FormValues::new()),
            Err(ModalError::NotOpen(id))
        );
    }

    #[test]
    fn crew_form_uses_a_text_area_for_description() {
        let form = ModalKind::CreateCrew.form();
        assert_eq!(form.fields[1].kind, InputKind::TextArea { rows: 4 });
        assert_eq!(form.fields[1].kind.html_type(), None);
        assert_eq!(form.submit_label, "Create Crew");
    }
}
