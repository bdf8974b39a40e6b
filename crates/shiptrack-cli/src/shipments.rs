//! # Shipment Subcommands
//!
//! `create`, `list`, and `track`, each authenticated with the saved session.
//! A rejected token is reported with a hint to log in again; a tracking
//! number that matches nothing is reported as a plain not-found message,
//! not as a failure.

use anyhow::Result;
use clap::Args;
use shiptrack_core::{
    CarrierMode, ShipmentForm, ShipmentMode, ShipmentRecord, ShipmentSummary, ShipmentType,
};

use crate::api::ApiError;
use crate::CliContext;

/// Fields of a new shipment.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Shipper name.
    #[arg(long)]
    pub shipper_name: String,
    /// Receiver name.
    #[arg(long)]
    pub receiver_name: String,
    /// Shipper address.
    #[arg(long)]
    pub shipper_address: String,
    /// Receiver address.
    #[arg(long)]
    pub receiver_address: String,
    /// Pickup date (e.g. 2025-01-01).
    #[arg(long)]
    pub pickup_date: String,
    /// Delivery date (e.g. 2025-01-05).
    #[arg(long)]
    pub delivery_date: String,
    /// Weight in kilograms.
    #[arg(long)]
    pub weight: String,
    /// Package description.
    #[arg(long)]
    pub package: String,
    /// Air Freight, Road Freight, or Sea Freight.
    #[arg(long)]
    pub shipment_mode: String,
    /// International Shipment or Local Shipment.
    #[arg(long)]
    pub shipment_type: String,
    /// DHL, FedEx, or USPS.
    #[arg(long)]
    pub carrier_mode: String,
}

impl CreateArgs {
    fn into_form(self) -> ShipmentForm {
        ShipmentForm {
            shipper_name: self.shipper_name,
            receiver_name: self.receiver_name,
            shipper_address: self.shipper_address,
            receiver_address: self.receiver_address,
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            weight: self.weight,
            package: self.package,
            shipment_mode: self.shipment_mode,
            shipment_type: self.shipment_type,
            carrier_mode: self.carrier_mode,
        }
    }
}

/// Arguments for `shiptrack track`.
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Tracking number printed at creation.
    pub tracking_number: String,
}

/// Create a shipment.
pub async fn run_create(ctx: &CliContext, args: CreateArgs) -> Result<u8> {
    let session = ctx.require_session()?;
    let form = args.into_form();
    warn_unknown_labels(&form);

    let record = ctx
        .shipment_api()?
        .create(&session.access_token, &form)
        .await
        .map_err(explain)?;

    println!("OK: created shipment {}", record.tracking_number);
    println!("  Status: {}", record.status);
    println!("  Share this tracking number with the receiver.");
    Ok(0)
}

/// List the signed-in user's shipments.
pub async fn run_list(ctx: &CliContext) -> Result<u8> {
    let session = ctx.require_session()?;
    let shipments = ctx
        .shipment_api()?
        .list(&session.access_token)
        .await
        .map_err(explain)?;

    if shipments.is_empty() {
        println!("No shipments yet.");
    } else {
        print!("{}", render_table(&shipments));
    }
    Ok(0)
}

/// Look up a shipment by tracking number.
pub async fn run_track(ctx: &CliContext, args: &TrackArgs) -> Result<u8> {
    let tracking_number = args.tracking_number.trim();
    if tracking_number.is_empty() {
        anyhow::bail!("tracking number must not be empty");
    }

    let session = ctx.require_session()?;
    let found = ctx
        .shipment_api()?
        .track(&session.access_token, tracking_number)
        .await
        .map_err(explain)?;

    match found {
        Some(record) => print!("{}", render_record(&record)),
        None => println!("No shipment found with tracking number {tracking_number}."),
    }
    Ok(0)
}

fn warn_unknown_labels(form: &ShipmentForm) {
    if !ShipmentMode::from(form.shipment_mode.as_str()).is_known() {
        tracing::warn!(value = %form.shipment_mode, known = ?ShipmentMode::KNOWN, "unrecognized shipment mode");
    }
    if !ShipmentType::from(form.shipment_type.as_str()).is_known() {
        tracing::warn!(value = %form.shipment_type, known = ?ShipmentType::KNOWN, "unrecognized shipment type");
    }
    if !CarrierMode::from(form.carrier_mode.as_str()).is_known() {
        tracing::warn!(value = %form.carrier_mode, known = ?CarrierMode::KNOWN, "unrecognized carrier");
    }
}

/// Turn an API error into a message for the terminal.
fn explain(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        return anyhow::Error::new(err).context("session rejected (run `shiptrack login` again)");
    }
    let extra = match &err {
        ApiError::Status {
            missing_fields,
            details,
            ..
        } => {
            if !missing_fields.is_empty() {
                Some(format!("missing: {}", missing_fields.join(", ")))
            } else {
                details.clone()
            }
        }
        _ => None,
    };
    match extra {
        Some(extra) => anyhow::Error::new(err).context(extra),
        None => anyhow::Error::new(err),
    }
}

/// Newest-first table of summaries.
pub fn render_table(shipments: &[ShipmentSummary]) -> String {
    let mut out = format!(
        "{:<10} {:<20} {:<16} {:>8} {:<8} {}\n",
        "TRACKING", "RECEIVER", "PACKAGE", "WEIGHT", "CARRIER", "CREATED"
    );
    for s in shipments {
        out.push_str(&format!(
            "{:<10} {:<20} {:<16} {:>8} {:<8} {}\n",
            s.tracking_number.as_str(),
            truncate(&s.receiver_name, 20),
            truncate(&s.package, 16),
            format!("{:.2}", s.weight),
            s.carrier_mode.as_str(),
            s.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    out
}

/// Full details of one shipment, including its history.
pub fn render_record(record: &ShipmentRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("Shipment {}\n", record.tracking_number));
    out.push_str(&format!("  Status: {}\n", record.status));
    out.push_str(&format!(
        "  From: {} ({})\n",
        record.shipper_name, record.shipper_address
    ));
    out.push_str(&format!(
        "  To: {} ({})\n",
        record.receiver_name, record.receiver_address
    ));
    out.push_str(&format!(
        "  Pickup: {}  Delivery: {}\n",
        record.pickup_date, record.delivery_date
    ));
    out.push_str(&format!(
        "  Package: {} ({:.2} kg)\n",
        record.package, record.weight
    ));
    out.push_str(&format!(
        "  Mode: {} / {} via {}\n",
        record.shipment_mode, record.shipment_type, record.carrier_mode
    ));
    out.push_str(&format!("  History ({}):\n", record.history.len()));
    for entry in &record.history {
        out.push_str(&format!(
            "    {} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.status
        ));
        if let Some(location) = &entry.location {
            out.push_str(&format!(" @ {location}"));
        }
        out.push('\n');
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
