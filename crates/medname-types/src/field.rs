//! Output field identifiers.

/// One of the four fields a product name is decomposed into.
///
/// # Examples
///
/// ```
/// use medname_types::Field;
///
/// assert_eq!(Field::Pack.column_name(), "PACK");
/// assert!(!Field::Forms.required());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// Brand or ingredient name left after stripping dose, pack and forms.
    Pure,
    /// Numeric dosage plus unit, e.g. `16MG`.
    Dose,
    /// Pack count plus form term, e.g. `30TB`.
    Pack,
    /// Space-joined form terms found in the name.
    Forms,
}

impl Field {
    /// All fields in output column order.
    pub const ALL: [Field; 4] = [Field::Pure, Field::Dose, Field::Pack, Field::Forms];

    /// Returns the output column header for this field.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Pure => "PURE",
            Self::Dose => "DOSE",
            Self::Pack => "PACK",
            Self::Forms => "FORMS",
        }
    }

    /// Returns true if an empty value in this field marks the row as unparsed.
    ///
    /// Only FORMS may be empty on an otherwise parsed row.
    pub fn required(self) -> bool {
        !matches!(self, Self::Forms)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}
