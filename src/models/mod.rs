use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned villa identifier
pub type VillaId = i64;

/// Facilities offered as checkboxes on the villa form
pub const FACILITIES: &[&str] = &[
    "Private Pool",
    "Wi-Fi",
    "Air Conditioning",
    "Kitchen",
    "Parking",
    "Breakfast Included",
    "Ocean View",
    "Rice Field View",
    "Garden",
    "Gym",
];

/// A persisted villa record, as stored in the `villas` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Villa {
    pub id: VillaId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facilities: Vec<String>,
    pub price: f64,
    pub commission: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub google_maps_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_phone: String,
    pub is_available: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub marketing_caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Villa payload without the server-assigned `id` and `created_at`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVilla {
    pub name: String,
    pub description: String,
    pub facilities: Vec<String>,
    pub price: f64,
    pub commission: f64,
    pub google_maps_link: String,
    pub photo_link: String,
    pub owner_phone: String,
    pub is_available: bool,
    pub marketing_caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Default for NewVilla {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            facilities: Vec::new(),
            price: 0.0,
            commission: 0.0,
            google_maps_link: String::new(),
            photo_link: String::new(),
            owner_phone: String::new(),
            is_available: true,
            marketing_caption: String::new(),
            user_id: None,
        }
    }
}

impl Villa {
    /// Build a stored record from a payload and the server-assigned columns
    pub fn from_new(id: VillaId, created_at: DateTime<Utc>, villa: NewVilla) -> Self {
        Self {
            id,
            created_at,
            name: villa.name,
            description: villa.description,
            facilities: villa.facilities,
            price: villa.price,
            commission: villa.commission,
            google_maps_link: villa.google_maps_link,
            photo_link: villa.photo_link,
            owner_phone: villa.owner_phone,
            is_available: villa.is_available,
            marketing_caption: villa.marketing_caption,
            user_id: villa.user_id,
        }
    }

    /// Copy of the editable columns
    pub fn to_new(&self) -> NewVilla {
        NewVilla {
            name: self.name.clone(),
            description: self.description.clone(),
            facilities: self.facilities.clone(),
            price: self.price,
            commission: self.commission,
            google_maps_link: self.google_maps_link.clone(),
            photo_link: self.photo_link.clone(),
            owner_phone: self.owner_phone.clone(),
            is_available: self.is_available,
            marketing_caption: self.marketing_caption.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// Nullable text/array columns come back as `null` from older rows
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
