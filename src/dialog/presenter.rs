use crate::schema::Field;

/// One labelled text input of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub label: String,
    pub hint: Option<String>,
}

impl Prompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Label is the field name, marked when it is the primary key; hint is the type.
    pub fn for_field(field: &Field) -> Self {
        let label = if field.is_primary_key() {
            format!("{} (PK)", field.name())
        } else {
            field.name().to_owned()
        };
        Self::new(label).with_hint(field.field_type().as_str())
    }
}

/// Whatever can put a form in front of the user.
pub trait FormPresenter {
    /// Shows `prompts` and returns one answer per prompt, or `None` if the
    /// user cancelled.
    fn present_form(&mut self, title: &str, prompts: &[Prompt]) -> Option<Vec<String>>;

    /// Tells the user why the last input was not accepted.
    fn report(&mut self, message: &str);
}

impl<P: FormPresenter + ?Sized> FormPresenter for &mut P {
    fn present_form(&mut self, title: &str, prompts: &[Prompt]) -> Option<Vec<String>> {
        (**self).present_form(title, prompts)
    }

    fn report(&mut self, message: &str) {
        (**self).report(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_field_prompt() {
        let id = Field::new("id", FieldType::U64).unwrap().primary_key();
        let prompt = Prompt::for_field(&id);
        assert_eq!(prompt.label, "id (PK)");
        assert_eq!(prompt.hint.as_deref(), Some("U64"));

        let plain = Field::new("value_a", FieldType::U32).unwrap();
        assert_eq!(Prompt::for_field(&plain).label, "value_a");
    }
}
