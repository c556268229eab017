//! Widget models

use kvmap_types::reflect_struct;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Button {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub text: String,
}

/// Continuous value control
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slider {
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Switch {
    pub on: bool,
}

/// Editable single-line text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    pub text: String,
    pub placeholder: Option<String>,
}

impl Button {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Slider {
    pub fn with_range(min: f64, max: f64) -> Self {
        Self {
            value: min,
            min,
            max,
        }
    }
}

impl TextField {
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            placeholder: Some(placeholder.into()),
        }
    }
}

reflect_struct!(Button { title });
reflect_struct!(Label { text });
reflect_struct!(Slider { value, min: readonly, max: readonly });
reflect_struct!(Switch { on });
reflect_struct!(TextField { text, placeholder });

#[cfg(test)]
mod tests {
    use super::*;
    use kvmap_types::{AccessError, Reflect, StaticSchema, TypeTag, Value};

    #[test]
    fn value_attributes() {
        let mut label = Label::default();
        label.set("text", Value::from("hello")).unwrap();
        assert_eq!(label.text, "hello");

        let mut switch = Switch::default();
        switch.set("on", Value::Boolean(true)).unwrap();
        assert!(switch.on);

        let mut button = Button::new("Ok");
        assert_eq!(button.get("title"), Some(Value::from("Ok")));
        assert!(button.set("title", Value::Integer(1)).is_err());
    }

    #[test]
    fn slider_bounds_are_read_only() {
        let mut slider = Slider::with_range(0.0, 10.0);
        slider.set("value", Value::Float(2.5)).unwrap();
        assert_eq!(slider.value, 2.5);
        assert_eq!(
            slider.set("max", Value::Float(1.0)),
            Err(AccessError::ReadOnly { field: "max".into() })
        );
        assert_eq!(slider.max, 10.0);
    }

    #[test]
    fn text_field_schema() {
        let schema = TextField::static_schema();
        assert_eq!(schema.name, "TextField");
        let tags: Vec<_> = schema.fields.iter().map(|f| f.declared_type.clone()).collect();
        assert_eq!(tags, vec![TypeTag::String, TypeTag::String]);

        let mut field = TextField::with_placeholder("Name");
        field.set("placeholder", Value::Null).unwrap();
        assert_eq!(field.placeholder, None);
    }
}
