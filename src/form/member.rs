//! Member record form and the `edit_record` entry point.

use super::coordinator::{FieldDescriptor, FormCoordinator, FormDescriptor, FormFlow, FormResult};
use super::surface::TerminalSurface;
use super::validation::{FieldKind, FieldValue};
use crate::domain::{MemberField, MemberRecord};
use crate::errors::FormError;

const ADD_TITLE: &str = "Add member";
const EDIT_TITLE: &str = "Edit member";

fn field_kind(field: MemberField) -> FieldKind {
    match field {
        MemberField::FirstName | MemberField::LastName => FieldKind::RequiredName,
        MemberField::HomeAddress => FieldKind::FreeText,
        MemberField::Zip => FieldKind::PostalCode,
        MemberField::Phone => FieldKind::Phone,
        MemberField::Email => FieldKind::Email,
        MemberField::MembershipStart => FieldKind::DateTime,
    }
}

/// [`FormFlow`] over the seven member fields.
pub struct MemberForm {
    descriptor: FormDescriptor,
    original: MemberRecord,
}

impl MemberForm {
    pub fn new(original: MemberRecord) -> Self {
        let title = if original.first_name.is_empty() && original.last_name.is_empty() {
            ADD_TITLE
        } else {
            EDIT_TITLE
        };
        let fields = MemberField::ALL
            .into_iter()
            .map(|field| FieldDescriptor::new(field.label(), field_kind(field)))
            .collect();
        Self {
            descriptor: FormDescriptor::new(title, fields),
            original,
        }
    }
}

fn text_value(value: Option<&str>) -> FieldValue {
    match value {
        Some(text) => FieldValue::Text(text.to_string()),
        None => FieldValue::Absent,
    }
}

impl FormFlow for MemberForm {
    type Output = MemberRecord;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn initial_values(&self) -> Vec<FieldValue> {
        let record = &self.original;
        MemberField::ALL
            .into_iter()
            .map(|field| match field {
                MemberField::FirstName if record.first_name.is_empty() => FieldValue::Absent,
                MemberField::FirstName => FieldValue::Text(record.first_name.clone()),
                MemberField::LastName if record.last_name.is_empty() => FieldValue::Absent,
                MemberField::LastName => FieldValue::Text(record.last_name.clone()),
                MemberField::HomeAddress => text_value(record.home_address.as_deref()),
                MemberField::Zip => text_value(record.zip.as_deref()),
                MemberField::Phone => text_value(record.phone_number.as_deref()),
                MemberField::Email => text_value(record.email.as_deref()),
                MemberField::MembershipStart => record
                    .membership_start
                    .map(FieldValue::DateTime)
                    .unwrap_or(FieldValue::Absent),
            })
            .collect()
    }

    fn commit(&self, values: &[FieldValue]) -> MemberRecord {
        let value = |field: MemberField| {
            MemberField::ALL
                .iter()
                .position(|candidate| *candidate == field)
                .and_then(|index| values.get(index))
                .cloned()
                .unwrap_or(FieldValue::Absent)
        };
        MemberRecord {
            id: self.original.id,
            first_name: value(MemberField::FirstName).into_text().unwrap_or_default(),
            last_name: value(MemberField::LastName).into_text().unwrap_or_default(),
            home_address: value(MemberField::HomeAddress).into_text(),
            zip: value(MemberField::Zip).into_text(),
            phone_number: value(MemberField::Phone).into_text(),
            email: value(MemberField::Email).into_text(),
            membership_start: value(MemberField::MembershipStart).as_date_time(),
        }
    }
}

/// Runs the member form on `surface` starting from `record`.
///
/// Pass an existing record to edit it or [`MemberRecord::blank`] to create
/// one. The returned record keeps the input's id. Surface failures are the
/// only errors; validation problems and cancellations are resolved inside the
/// form.
pub fn edit_record<S>(
    surface: &mut S,
    record: &MemberRecord,
) -> Result<FormResult<MemberRecord>, FormError>
where
    S: TerminalSurface + ?Sized,
{
    let form = MemberForm::new(record.clone());
    let mut coordinator = FormCoordinator::new(&form);
    coordinator.run(surface)
}
