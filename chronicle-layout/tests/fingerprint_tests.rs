mod common;

use chronicle_layout::{
    Construction, EnumShape, FieldValue, Layout, LayoutOptions, Property, Schematic, TypeHandler,
};
use common::{Ticket, TicketCopy};

const CONTENT_ONLY: LayoutOptions = LayoutOptions {
    hash_type_name: false,
    allow_read_only: false,
};

#[test]
fn deriving_twice_yields_identical_fingerprints() {
    let a = Layout::<Ticket>::derive(&LayoutOptions::default()).expect("derive");
    let b = Layout::<Ticket>::derive(&LayoutOptions::default()).expect("derive");
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn strict_mode_distinguishes_type_names() {
    let a = Layout::<Ticket>::derive(&LayoutOptions::default()).expect("derive");
    let b = Layout::<TicketCopy>::derive(&LayoutOptions::default()).expect("derive");
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn content_only_mode_matches_identical_shapes() {
    let a = Layout::<Ticket>::derive(&CONTENT_ONLY).expect("derive");
    let b = Layout::<TicketCopy>::derive(&CONTENT_ONLY).expect("derive");
    assert_eq!(a.fingerprint(), b.fingerprint());
}

// Renamed-property twin of Ticket.
#[derive(Debug, Clone, Default)]
struct RenamedTicket {
    title: String,
    priority: i32,
    open: bool,
}

impl Schematic for RenamedTicket {
    const TYPE_NAME: &'static str = "Ticket";

    fn properties() -> Vec<Property<Self>> {
        vec![
            // "subject" instead of "title"
            Property::new("subject", TypeHandler::Str, |t: &Self| {
                FieldValue::Str(t.title.clone())
            })
            .with_set(|t, v| {
                t.title = v.take_str()?;
                Ok(())
            }),
            Property::new("priority", TypeHandler::Int, |t: &Self| {
                FieldValue::Int(t.priority)
            })
            .with_set(|t, v| {
                t.priority = v.take_int()?;
                Ok(())
            }),
            Property::new("open", TypeHandler::Bool, |t: &Self| {
                FieldValue::Bool(t.open)
            })
            .with_set(|t, v| {
                t.open = v.take_bool()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

// Retyped-property twin of Ticket (priority widened to long).
#[derive(Debug, Clone, Default)]
struct RetypedTicket {
    title: String,
    priority: i64,
    open: bool,
}

impl Schematic for RetypedTicket {
    const TYPE_NAME: &'static str = "Ticket";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("title", TypeHandler::Str, |t: &Self| {
                FieldValue::Str(t.title.clone())
            })
            .with_set(|t, v| {
                t.title = v.take_str()?;
                Ok(())
            }),
            Property::new("priority", TypeHandler::Long, |t: &Self| {
                FieldValue::Long(t.priority)
            })
            .with_set(|t, v| {
                t.priority = v.take_long()?;
                Ok(())
            }),
            Property::new("open", TypeHandler::Bool, |t: &Self| {
                FieldValue::Bool(t.open)
            })
            .with_set(|t, v| {
                t.open = v.take_bool()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

#[test]
fn renaming_a_property_changes_the_fingerprint() {
    let a = Layout::<Ticket>::derive(&CONTENT_ONLY).expect("derive");
    let b = Layout::<RenamedTicket>::derive(&CONTENT_ONLY).expect("derive");
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn retyping_a_property_changes_the_fingerprint() {
    let a = Layout::<Ticket>::derive(&CONTENT_ONLY).expect("derive");
    let b = Layout::<RetypedTicket>::derive(&CONTENT_ONLY).expect("derive");
    assert_ne!(a.fingerprint(), b.fingerprint());
}

// Single-enum-property holders whose shapes differ only in constant order
// (which renumbers ordinals) or in a constant's name.

macro_rules! enum_holder {
    ($name:ident, $variants:expr) => {
        #[derive(Debug, Clone, Default)]
        struct $name {
            value: i32,
        }

        impl Schematic for $name {
            const TYPE_NAME: &'static str = "Status";

            fn properties() -> Vec<Property<Self>> {
                vec![Property::new(
                    "value",
                    TypeHandler::Enum(EnumShape::new($variants).expect("shape")),
                    |h: &Self| FieldValue::Enum(h.value),
                )
                .with_set(|h, v| {
                    h.value = v.take_enum()?;
                    Ok(())
                })]
            }

            fn construction() -> Construction<Self> {
                Construction::Mutable(Self::default)
            }
        }
    };
}

enum_holder!(OriginalStatus, [("Low", 0), ("Medium", 1), ("High", 2)]);
enum_holder!(ReorderedStatus, [("Medium", 0), ("Low", 1), ("High", 2)]);
enum_holder!(RenamedStatus, [("Lowest", 0), ("Medium", 1), ("High", 2)]);

#[test]
fn reordering_enum_constants_changes_the_fingerprint() {
    let a = Layout::<OriginalStatus>::derive(&CONTENT_ONLY).expect("derive");
    let b = Layout::<ReorderedStatus>::derive(&CONTENT_ONLY).expect("derive");
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn renaming_an_enum_constant_changes_the_fingerprint() {
    let a = Layout::<OriginalStatus>::derive(&CONTENT_ONLY).expect("derive");
    let b = Layout::<RenamedStatus>::derive(&CONTENT_ONLY).expect("derive");
    assert_ne!(a.fingerprint(), b.fingerprint());
}
