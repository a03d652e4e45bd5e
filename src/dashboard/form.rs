use thiserror::Error;
use tracing::debug;

use crate::dashboard::notify::Notification;
use crate::dashboard::repository::VillaRepository;
use crate::error::DashboardError;
use crate::models::{NewVilla, Villa, VillaId, FACILITIES};

/// Free-text columns of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Description,
    GoogleMapsLink,
    PhotoLink,
    OwnerPhone,
    MarketingCaption,
}

/// Columns typed into number inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Price,
    Commission,
}

/// One input event, tagged with the field it targets
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(TextField, String),
    /// Raw text from a number input, normalized by `parse_numeric`
    Numeric(NumericField, String),
    Availability(bool),
}

/// Parse the numeric prefix of `raw` the way a browser number field reads it
///
/// Leading whitespace is skipped and trailing garbage ignored ("12abc" is 12).
/// Anything without a leading number, a non-finite value, or zero yields 0.0,
/// so a keystroke is never rejected.
pub fn parse_numeric(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_at = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let int_end = digits_at(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_at(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_at(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(VillaId),
}

/// Editable draft of a single villa, private to the open form
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    mode: FormMode,
    draft: NewVilla,
}

/// A submit that the repository accepted
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub villa: Villa,
    pub notification: Notification,
}

/// A rejected submit; hands the session back with its draft intact
#[derive(Error, Debug)]
#[error("{error}")]
pub struct SubmitError {
    pub session: FormSession,
    #[source]
    pub error: DashboardError,
}

impl SubmitError {
    pub fn notification(&self) -> Notification {
        Notification::error(self.error.message())
    }
}

impl FormSession {
    /// Start a draft, either blank or copied from an existing villa
    pub fn open(seed: Option<&Villa>) -> Self {
        match seed {
            Some(villa) => {
                let mut draft = villa.to_new();
                let mut facilities: Vec<String> = Vec::with_capacity(draft.facilities.len());
                for tag in draft.facilities.drain(..) {
                    if !facilities.contains(&tag) {
                        facilities.push(tag);
                    }
                }
                draft.facilities = facilities;
                Self {
                    mode: FormMode::Edit(villa.id),
                    draft,
                }
            }
            None => Self {
                mode: FormMode::Create,
                draft: NewVilla::default(),
            },
        }
    }

    /// Throw away the current draft and start over from `seed`
    pub fn reopen(&mut self, seed: Option<&Villa>) {
        *self = Self::open(seed);
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &NewVilla {
        &self.draft
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add a New Villa",
            FormMode::Edit(_) => "Edit Villa Details",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Publish Villa",
            FormMode::Edit(_) => "Save Changes",
        }
    }

    pub fn set_field(&mut self, input: FieldInput) {
        let draft = &mut self.draft;
        match input {
            FieldInput::Text(field, value) => {
                let slot = match field {
                    TextField::Name => &mut draft.name,
                    TextField::Description => &mut draft.description,
                    TextField::GoogleMapsLink => &mut draft.google_maps_link,
                    TextField::PhotoLink => &mut draft.photo_link,
                    TextField::OwnerPhone => &mut draft.owner_phone,
                    TextField::MarketingCaption => &mut draft.marketing_caption,
                };
                *slot = value;
            }
            FieldInput::Numeric(NumericField::Price, raw) => draft.price = parse_numeric(&raw),
            FieldInput::Numeric(NumericField::Commission, raw) => {
                draft.commission = parse_numeric(&raw)
            }
            FieldInput::Availability(flag) => draft.is_available = flag,
        }
    }

    /// Add `tag` if absent, otherwise remove it
    pub fn toggle_facility(&mut self, tag: &str) {
        let facilities = &mut self.draft.facilities;
        match facilities.iter().position(|f| f == tag) {
            Some(index) => {
                facilities.remove(index);
            }
            None => facilities.push(tag.to_string()),
        }
    }

    /// The facility checklist in catalog order
    pub fn facility_options(&self) -> Vec<(&'static str, bool)> {
        FACILITIES
            .iter()
            .map(|&tag| (tag, self.draft.facilities.iter().any(|f| f == tag)))
            .collect()
    }

    /// Hand a snapshot of the draft to the repository
    ///
    /// Success consumes the session. On failure the untouched session comes
    /// back inside the error so the operator can amend and retry.
    pub async fn submit(self, repo: &VillaRepository) -> Result<Submitted, SubmitError> {
        let snapshot = self.draft.clone();
        debug!("Submitting villa form in {:?} mode", self.mode);

        let result = match self.mode {
            FormMode::Create => repo.create(snapshot).await,
            FormMode::Edit(id) => repo.update(id, snapshot).await,
        };

        match result {
            Ok(villa) => {
                let verb = match self.mode {
                    FormMode::Create => "added",
                    FormMode::Edit(_) => "updated",
                };
                Ok(Submitted {
                    villa,
                    notification: Notification::success(format!("Villa {} successfully!", verb)),
                })
            }
            Err(error) => Err(SubmitError {
                session: self,
                error,
            }),
        }
    }

    /// Abandon the draft without touching the store
    pub fn discard(self) {
        debug!("Discarded villa form in {:?} mode", self.mode);
    }
}
