//! # Shipment Labels
//!
//! The frontend offers fixed choices for mode, type, carrier, and status,
//! but the handlers never enforced them: whatever label a client sent is
//! stored as-is. These types name the known labels and keep everything else
//! in an `Other` variant, so a row always serializes back to exactly the
//! string it was created with.

use serde::{Deserialize, Serialize};

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A label outside the known set, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Every known label, in the order the frontend lists them.
            pub const KNOWN: &'static [&'static str] = &[$($label),+];

            /// The label as stored and displayed.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $label, )+
                    Self::Other(label) => label,
                }
            }

            /// Whether this is one of the known labels.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                match label.as_str() {
                    $( $label => Self::$variant, )+
                    _ => Self::Other(label),
                }
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self::from(label.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                match value {
                    $name::Other(label) => label,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// How the shipment travels.
    pub enum ShipmentMode {
        /// Air freight.
        AirFreight => "Air Freight",
        /// Road freight.
        RoadFreight => "Road Freight",
        /// Sea freight.
        SeaFreight => "Sea Freight",
    }
}

label_enum! {
    /// Whether the shipment crosses a border.
    pub enum ShipmentType {
        /// Crosses a national border.
        International => "International Shipment",
        /// Stays within one country.
        Local => "Local Shipment",
    }
}

label_enum! {
    /// Carrier handling the shipment.
    pub enum CarrierMode {
        /// DHL.
        Dhl => "DHL",
        /// FedEx.
        FedEx => "FedEx",
        /// United States Postal Service.
        Usps => "USPS",
    }
}

label_enum! {
    /// Lifecycle label of a shipment.
    pub enum ShipmentStatus {
        /// Initial state of every persisted shipment.
        Created => "Shipment Created",
        /// Awaiting pickup.
        Pending => "Pending",
        /// Collected from the shipper.
        PickedUp => "Picked Up",
        /// Between facilities.
        InTransit => "In Transit",
        /// On the last leg to the receiver.
        OutForDelivery => "Out for Delivery",
        /// Handed to the receiver.
        Delivered => "Delivered",
        /// Cancelled before delivery.
        Cancelled => "Cancelled",
        /// Held by the carrier.
        OnHold => "On Hold",
    }
}

impl Default for ShipmentStatus {
    fn default() -> Self {
        Self::Created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_parse_to_variants() {
        assert_eq!(ShipmentMode::from("Air Freight"), ShipmentMode::AirFreight);
        assert_eq!(ShipmentType::from("Local Shipment"), ShipmentType::Local);
        assert_eq!(CarrierMode::from("DHL"), CarrierMode::Dhl);
        assert_eq!(ShipmentStatus::from("Out for Delivery"), ShipmentStatus::OutForDelivery);
    }

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        let carrier = CarrierMode::from("UPS");
        assert_eq!(carrier, CarrierMode::Other("UPS".into()));
        assert!(!carrier.is_known());
        assert_eq!(String::from(carrier), "UPS");
    }

    #[test]
    fn label_matching_is_case_sensitive() {
        assert!(!ShipmentMode::from("air freight").is_known());
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_string(&ShipmentStatus::Created).unwrap();
        assert_eq!(json, "\"Shipment Created\"");
        let back: ShipmentStatus = serde_json::from_str("\"In Transit\"").unwrap();
        assert_eq!(back, ShipmentStatus::InTransit);
    }

    #[test]
    fn default_status_is_created() {
        assert_eq!(ShipmentStatus::default().as_str(), "Shipment Created");
    }

    #[test]
    fn known_lists_match_frontend_choices() {
        assert_eq!(ShipmentMode::KNOWN, &["Air Freight", "Road Freight", "Sea Freight"]);
        assert_eq!(CarrierMode::KNOWN.len(), 3);
        assert_eq!(ShipmentStatus::KNOWN.len(), 8);
    }
}
