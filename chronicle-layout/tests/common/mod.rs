//! Shared fixture types for layout tests.

use chronicle_layout::{
    nested_value, record_shape_of, Construction, EnumShape, FieldValue, Property, Schematic,
    TypeHandler,
};
use uuid::Uuid;

/// Mutable fixture: no-arg construction plus setters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub title: String,
    pub priority: i32,
    pub open: bool,
}

impl Schematic for Ticket {
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

/// Same property shape as [`Ticket`] under a different type name, for
/// content-only fingerprint matching tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketCopy {
    pub title: String,
    pub priority: i32,
    pub open: bool,
}

impl Schematic for TicketCopy {
    const TYPE_NAME: &'static str = "TicketCopy";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("title", TypeHandler::Str, |t: &Self| {
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

/// Immutable fixture: positional construction in lexicographic property
/// order (latitude, longitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Schematic for Coordinate {
    const TYPE_NAME: &'static str = "Coordinate";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("longitude", TypeHandler::Double, |c: &Self| {
                FieldValue::Double(c.longitude)
            }),
            Property::new("latitude", TypeHandler::Double, |c: &Self| {
                FieldValue::Double(c.latitude)
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Positional(|mut values| {
            let longitude = values.pop().expect("arity checked").take_double()?;
            let latitude = values.pop().expect("arity checked").take_double()?;
            Ok(Self {
                latitude,
                longitude,
            })
        })
    }
}

/// Fixture with a getter-only property, for read-only layout tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gauge {
    pub name: String,
    pub reading: f64,
}

impl Schematic for Gauge {
    const TYPE_NAME: &'static str = "Gauge";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("name", TypeHandler::Str, |g: &Self| {
                FieldValue::Str(g.name.clone())
            })
            .with_set(|g, v| {
                g.name = v.take_str()?;
                Ok(())
            }),
            // Derived measurement: readable, never writable.
            Property::new("reading", TypeHandler::Double, |g: &Self| {
                FieldValue::Double(g.reading)
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}

pub fn severity_shape() -> EnumShape {
    EnumShape::new([("Low", 0), ("Medium", 1), ("High", 2)]).expect("valid enum shape")
}

/// Kitchen-sink fixture: every composite handler shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Incident {
    pub id: Uuid,
    pub severity: i32,
    pub tags: Vec<String>,
    pub assignee: Option<String>,
    pub payload: Vec<u8>,
    pub location: Option<Coordinate>,
}

impl Schematic for Incident {
    const TYPE_NAME: &'static str = "Incident";

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new("id", TypeHandler::Uuid, |i: &Self| FieldValue::Uuid(i.id)).with_set(
                |i, v| {
                    i.id = v.take_uuid()?;
                    Ok(())
                },
            ),
            Property::new("severity", TypeHandler::Enum(severity_shape()), |i: &Self| {
                FieldValue::Enum(i.severity)
            })
            .with_set(|i, v| {
                i.severity = v.take_enum()?;
                Ok(())
            }),
            Property::new("tags", TypeHandler::list_of(TypeHandler::Str), |i: &Self| {
                FieldValue::List(i.tags.iter().map(|t| FieldValue::Str(t.clone())).collect())
            })
            .with_set(|i, v| {
                i.tags = v
                    .take_list()?
                    .into_iter()
                    .map(FieldValue::take_str)
                    .collect::<Result<_, _>>()?;
                Ok(())
            }),
            Property::new(
                "assignee",
                TypeHandler::optional_of(TypeHandler::Str),
                |i: &Self| FieldValue::optional(i.assignee.clone().map(FieldValue::Str)),
            )
            .with_set(|i, v| {
                i.assignee = v.take_optional()?.map(FieldValue::take_str).transpose()?;
                Ok(())
            }),
            Property::new("payload", TypeHandler::Bytes, |i: &Self| {
                FieldValue::Bytes(i.payload.clone())
            })
            .with_set(|i, v| {
                i.payload = v.take_bytes()?;
                Ok(())
            }),
            Property::new(
                "location",
                TypeHandler::optional_of(TypeHandler::Record(
                    record_shape_of::<Coordinate>().expect("valid record shape"),
                )),
                |i: &Self| FieldValue::optional(i.location.as_ref().map(nested_value)),
            )
            .with_set(|i, v| {
                i.location = v
                    .take_optional()?
                    .map(chronicle_layout::nested_from::<Coordinate>)
                    .transpose()?;
                Ok(())
            }),
        ]
    }

    fn construction() -> Construction<Self> {
        Construction::Mutable(Self::default)
    }
}
