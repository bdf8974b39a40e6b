//! # Shipment Submissions
//!
//! A create request arrives as loosely typed JSON. [`ShipmentSubmission::from_json`]
//! checks the whole required-field set before rejecting, so the caller learns
//! every missing field in one round trip.
//!
//! Presence follows JavaScript truthiness, because that is what clients were
//! written against: `null`, `false`, `0`, and `""` count as missing.
//!
//! Weight is the one field that is coerced rather than validated: a leading
//! numeric prefix is parsed and anything unparsable becomes `0`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmissionError;
use crate::labels::{CarrierMode, ShipmentMode, ShipmentType};

/// Wire names of the required fields, in reporting order.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "shipperName",
    "receiverName",
    "shipperAddress",
    "receiverAddress",
    "pickupDate",
    "deliveryDate",
    "weight",
    "package",
    "shipmentMode",
    "shipmentType",
    "carrierMode",
];

/// The create form as a client submits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentForm {
    /// Shipper name.
    pub shipper_name: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Shipper address.
    pub shipper_address: String,
    /// Receiver address.
    pub receiver_address: String,
    /// Pickup date, e.g. `2025-01-01`.
    pub pickup_date: String,
    /// Delivery date, e.g. `2025-01-05`.
    pub delivery_date: String,
    /// Weight as typed; coerced server-side.
    pub weight: String,
    /// Package description.
    pub package: String,
    /// Shipment mode label.
    pub shipment_mode: String,
    /// Shipment type label.
    pub shipment_type: String,
    /// Carrier label.
    pub carrier_mode: String,
}

/// A submission with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentSubmission {
    /// Shipper name.
    pub shipper_name: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Shipper address.
    pub shipper_address: String,
    /// Receiver address.
    pub receiver_address: String,
    /// Pickup date.
    pub pickup_date: String,
    /// Delivery date.
    pub delivery_date: String,
    /// Coerced weight.
    pub weight: f64,
    /// Package description.
    pub package: String,
    /// Shipment mode.
    pub shipment_mode: ShipmentMode,
    /// Shipment type.
    pub shipment_type: ShipmentType,
    /// Carrier.
    pub carrier_mode: CarrierMode,
}

impl ShipmentSubmission {
    /// Validate a JSON body.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::MissingFields`] naming every required field that is
    /// absent or falsy. A body that is not an object has all of them missing.
    pub fn from_json(body: &Value) -> Result<Self, SubmissionError> {
        let present = |name: &str| body.get(name).filter(|v| !is_falsy(v));

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|name| present(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }

        let text = |name: &str| present(name).map(value_text).unwrap_or_default();

        Ok(Self {
            shipper_name: text("shipperName"),
            receiver_name: text("receiverName"),
            shipper_address: text("shipperAddress"),
            receiver_address: text("receiverAddress"),
            pickup_date: text("pickupDate"),
            delivery_date: text("deliveryDate"),
            weight: present("weight").map(coerce_weight).unwrap_or(0.0),
            package: text("package"),
            shipment_mode: text("shipmentMode").into(),
            shipment_type: text("shipmentType").into(),
            carrier_mode: text("carrierMode").into(),
        })
    }
}

/// JavaScript truthiness, restricted to JSON values.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Coerce a submitted weight to a number.
///
/// JSON numbers are taken as-is; strings are parsed by their leading numeric
/// prefix (`"3.5kg"` is 3.5). Anything unparsable, non-finite, or negative
/// becomes `0`.
pub fn coerce_weight(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    match parsed {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => 0.0,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the longest decimal literal at the start of `input`, after leading
/// whitespace: optional sign, digits with an optional fraction, optional
/// exponent.
fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "shipperName": "A",
            "receiverName": "B",
            "shipperAddress": "X",
            "receiverAddress": "Y",
            "pickupDate": "2025-01-01",
            "deliveryDate": "2025-01-05",
            "weight": "2.3",
            "package": "Books",
            "shipmentMode": "Air Freight",
            "shipmentType": "Local Shipment",
            "carrierMode": "DHL"
        })
    }

    #[test]
    fn valid_submission_parses() {
        let sub = ShipmentSubmission::from_json(&valid_body()).unwrap();
        assert_eq!(sub.shipper_name, "A");
        assert_eq!(sub.weight, 2.3);
        assert_eq!(sub.shipment_mode, ShipmentMode::AirFreight);
        assert_eq!(sub.shipment_type, ShipmentType::Local);
        assert_eq!(sub.carrier_mode, CarrierMode::Dhl);
    }

    #[test]
    fn single_missing_field_is_reported() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("shipmentMode");
        let err = ShipmentSubmission::from_json(&body).unwrap_err();
        assert_eq!(err.missing_fields(), &["shipmentMode"]);
    }

    #[test]
    fn every_missing_field_is_reported() {
        let err = ShipmentSubmission::from_json(&json!({ "package": "Books" })).unwrap_err();
        assert_eq!(err.missing_fields().len(), 10);
        assert!(!err.missing_fields().contains(&"package"));
        assert_eq!(err.missing_fields()[0], "shipperName");
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let mut body = valid_body();
        let obj = body.as_object_mut().unwrap();
        obj.insert("shipperName".into(), json!(""));
        obj.insert("receiverName".into(), Value::Null);
        obj.insert("weight".into(), json!(0));
        obj.insert("package".into(), json!(false));
        let err = ShipmentSubmission::from_json(&body).unwrap_err();
        assert_eq!(
            err.missing_fields(),
            &["shipperName", "receiverName", "weight", "package"]
        );
    }

    #[test]
    fn non_object_body_misses_everything() {
        let err = ShipmentSubmission::from_json(&json!(["shipperName"])).unwrap_err();
        assert_eq!(err.missing_fields(), REQUIRED_FIELDS.as_slice());
    }

    #[test]
    fn garbage_weight_is_accepted_as_zero() {
        let mut body = valid_body();
        body["weight"] = json!("abc");
        let sub = ShipmentSubmission::from_json(&body).unwrap();
        assert_eq!(sub.weight, 0.0);
    }

    #[test]
    fn numeric_weight_is_kept() {
        let mut body = valid_body();
        body["weight"] = json!(12.75);
        let sub = ShipmentSubmission::from_json(&body).unwrap();
        assert_eq!(sub.weight, 12.75);
    }

    #[test]
    fn non_string_text_fields_are_stringified() {
        let mut body = valid_body();
        body["package"] = json!(42);
        let sub = ShipmentSubmission::from_json(&body).unwrap();
        assert_eq!(sub.package, "42");
    }

    #[test]
    fn unknown_labels_pass_through() {
        let mut body = valid_body();
        body["carrierMode"] = json!("UPS");
        let sub = ShipmentSubmission::from_json(&body).unwrap();
        assert_eq!(sub.carrier_mode.as_str(), "UPS");
    }

    #[test]
    fn form_serializes_camel_case_and_validates() {
        let form = ShipmentForm {
            shipper_name: "A".into(),
            receiver_name: "B".into(),
            shipper_address: "X".into(),
            receiver_address: "Y".into(),
            pickup_date: "2025-01-01".into(),
            delivery_date: "2025-01-05".into(),
            weight: "3.5".into(),
            package: "Books".into(),
            shipment_mode: "Sea Freight".into(),
            shipment_type: "International Shipment".into(),
            carrier_mode: "FedEx".into(),
        };
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["shipperName"], "A");
        let sub = ShipmentSubmission::from_json(&body).unwrap();
        assert_eq!(sub.weight, 3.5);
    }

    #[test]
    fn coerce_weight_cases() {
        assert_eq!(coerce_weight(&json!("abc")), 0.0);
        assert_eq!(coerce_weight(&json!("3.5")), 3.5);
        assert_eq!(coerce_weight(&json!("  2.3")), 2.3);
        assert_eq!(coerce_weight(&json!("3.5kg")), 3.5);
        assert_eq!(coerce_weight(&json!(".5")), 0.5);
        assert_eq!(coerce_weight(&json!("1e3")), 1000.0);
        assert_eq!(coerce_weight(&json!("7e")), 7.0);
        assert_eq!(coerce_weight(&json!("-4")), 0.0);
        assert_eq!(coerce_weight(&json!("Infinity")), 0.0);
        assert_eq!(coerce_weight(&json!(".")), 0.0);
        assert_eq!(coerce_weight(&json!(true)), 0.0);
        assert_eq!(coerce_weight(&json!(8)), 8.0);
    }

    #[test]
    fn falsiness_matches_javascript() {
        assert!(is_falsy(&Value::Null));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!(0.0)));
        assert!(is_falsy(&json!("")));
        assert!(!is_falsy(&json!("0")));
        assert!(!is_falsy(&json!(" ")));
        assert!(!is_falsy(&json!([])));
        assert!(!is_falsy(&json!({})));
        assert!(!is_falsy(&json!(true)));
    }

    proptest! {
        #[test]
        fn missing_list_is_exactly_the_removed_subset(mask in 0u16..(1 << 11)) {
            let mut body = valid_body();
            let obj = body.as_object_mut().unwrap();
            let mut removed = Vec::new();
            for (i, name) in REQUIRED_FIELDS.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    obj.remove(*name);
                    removed.push(*name);
                }
            }
            match ShipmentSubmission::from_json(&body) {
                Ok(_) => prop_assert!(removed.is_empty()),
                Err(err) => prop_assert_eq!(err.missing_fields(), removed.as_slice()),
            }
        }

        #[test]
        fn decimal_strings_coerce_to_their_value(w in 0.001f64..1.0e6) {
            let text = format!("{w}");
            prop_assert_eq!(coerce_weight(&Value::String(text)), w);
        }
    }
}
