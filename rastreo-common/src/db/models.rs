//! Shipment record model and the typed column allow-list

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One tracked package's metadata row, as returned by every query endpoint
///
/// `created_at` / `updated_at` are bookkeeping columns and are not part of
/// the API response shape.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shipment {
    pub id: i64,
    pub numero_seguimiento: Option<String>,
    pub codigo_ddp: Option<String>,
    pub nombre_receptor: Option<String>,
    pub peso: f64,
    pub contenido: Option<String>,
    pub empresa_transporte: Option<String>,
    pub proveedor: Option<String>,
    pub fecha_recepcion: Option<NaiveDate>,
    pub fecha_envio: Option<NaiveDate>,
    pub costo: f64,
    pub moneda_costo: String,
    pub imagen_link: Option<String>,
    pub estado: Option<String>,
}

/// Shipment lifecycle status labels (closed set)
///
/// Stored as the exact label text; anything outside this set is rejected
/// wherever edits are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentStatus {
    RecibidoEnCucuta,
    EnviadoATachira,
    EnviadoACliente,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 3] = [
        ShipmentStatus::RecibidoEnCucuta,
        ShipmentStatus::EnviadoATachira,
        ShipmentStatus::EnviadoACliente,
    ];

    /// Default status for newly created records
    pub fn initial() -> ShipmentStatus {
        ShipmentStatus::RecibidoEnCucuta
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            ShipmentStatus::RecibidoEnCucuta => "RECIBIDO EN CUCUTA",
            ShipmentStatus::EnviadoATachira => "ENVIADO A TACHIRA",
            ShipmentStatus::EnviadoACliente => "ENVIADO A CLIENTE",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<ShipmentStatus> {
        let normalized = label.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|s| s.as_label() == normalized)
    }
}

/// Broad value category of a mutable column, used to pick the
/// validation/normalization rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// YYYY-MM-DD or N/A (stored null)
    Date,
    /// Decimal number (peso, costo)
    Numeric,
    /// Trimmed and upper-cased (nombre_receptor)
    UpperText,
    /// Non-digit characters stripped (codigo_ddp)
    Digits,
    /// Closed label set (estado)
    Status,
    /// Trimmed verbatim text
    Text,
}

/// Closed set of columns that mutation operations may touch
///
/// `id`, `created_at`, and `updated_at` are deliberately not members: SQL
/// text only ever embeds the static column names below, so a caller-chosen
/// field name can never reach the statement builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentField {
    NumeroSeguimiento,
    CodigoDdp,
    NombreReceptor,
    Peso,
    Contenido,
    EmpresaTransporte,
    Proveedor,
    FechaRecepcion,
    FechaEnvio,
    Costo,
    MonedaCosto,
    ImagenLink,
    Estado,
}

impl ShipmentField {
    pub const ALL: [ShipmentField; 13] = [
        ShipmentField::NumeroSeguimiento,
        ShipmentField::CodigoDdp,
        ShipmentField::NombreReceptor,
        ShipmentField::Peso,
        ShipmentField::Contenido,
        ShipmentField::EmpresaTransporte,
        ShipmentField::Proveedor,
        ShipmentField::FechaRecepcion,
        ShipmentField::FechaEnvio,
        ShipmentField::Costo,
        ShipmentField::MonedaCosto,
        ShipmentField::ImagenLink,
        ShipmentField::Estado,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            ShipmentField::NumeroSeguimiento => "numero_seguimiento",
            ShipmentField::CodigoDdp => "codigo_ddp",
            ShipmentField::NombreReceptor => "nombre_receptor",
            ShipmentField::Peso => "peso",
            ShipmentField::Contenido => "contenido",
            ShipmentField::EmpresaTransporte => "empresa_transporte",
            ShipmentField::Proveedor => "proveedor",
            ShipmentField::FechaRecepcion => "fecha_recepcion",
            ShipmentField::FechaEnvio => "fecha_envio",
            ShipmentField::Costo => "costo",
            ShipmentField::MonedaCosto => "moneda_costo",
            ShipmentField::ImagenLink => "imagen_link",
            ShipmentField::Estado => "estado",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ShipmentField::FechaRecepcion | ShipmentField::FechaEnvio => FieldKind::Date,
            ShipmentField::Peso | ShipmentField::Costo => FieldKind::Numeric,
            ShipmentField::NombreReceptor => FieldKind::UpperText,
            ShipmentField::CodigoDdp => FieldKind::Digits,
            ShipmentField::Estado => FieldKind::Status,
            ShipmentField::NumeroSeguimiento
            | ShipmentField::Contenido
            | ShipmentField::EmpresaTransporte
            | ShipmentField::Proveedor
            | ShipmentField::MonedaCosto
            | ShipmentField::ImagenLink => FieldKind::Text,
        }
    }
}

impl std::str::FromStr for ShipmentField {
    type Err = crate::Error;

    /// Parse a column name into the allow-list, rejecting everything else
    /// (including `id` and the timestamp columns)
    fn from_str(s: &str) -> crate::Result<Self> {
        ShipmentField::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Field not editable: {}", s)))
    }
}

/// A normalized scalar ready to be bound into a statement
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Real(f64),
    Date(NaiveDate),
}

impl FieldValue {
    /// Default used by create/update-full when a field is absent from the
    /// submitted record: 0 for numerics, USD for the currency, the initial
    /// status for estado, null for everything else.
    pub fn default_for(field: ShipmentField) -> FieldValue {
        match field {
            ShipmentField::Peso | ShipmentField::Costo => FieldValue::Real(0.0),
            ShipmentField::MonedaCosto => FieldValue::Text("USD".to_string()),
            ShipmentField::Estado => {
                FieldValue::Text(ShipmentStatus::initial().as_label().to_string())
            }
            _ => FieldValue::Null,
        }
    }
}
