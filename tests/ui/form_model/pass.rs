use careform::form::{FieldKey, FieldLens, FormModel};

#[derive(Clone, careform::form::FormModel)]
struct ContactForm {
    email: String,
    accepts_terms: bool,
}

fn main() {
    let fields = ContactForm::fields();
    let lens = fields.email();
    let mut model = ContactForm {
        email: "a@example.com".to_string(),
        accepts_terms: false,
    };
    lens.set(&mut model, "b@example.com".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@example.com");

    fields.accepts_terms().set(&mut model, true);
    assert!(model.accepts_terms);
    assert_eq!(
        ContactForm::FIELD_KEYS,
        &[FieldKey::new("email"), FieldKey::new("accepts_terms")]
    );
}
