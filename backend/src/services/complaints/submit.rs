//! Complaint intake: the multipart form behind `POST /submit_complaint`.
//!
//! Text fields are collected into a [`ComplaintForm`]; the optional `media`
//! file is streamed chunk by chunk straight into the upload directory under
//! the name `<complaint_id><original extension>`. A media save failure is
//! logged and downgraded: the complaint is still recorded, just without a
//! `file_path`. Only a missing vehicle number or a store failure rejects
//! the submission.

use crate::config::AppConfig;
use crate::db::ComplaintStore;
use crate::error::AppError;
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Local, NaiveDate};
use common::model::complaint::{Complaint, Status};
use common::requests::SubmitComplaintResponse;
use futures_util::StreamExt;
use lazy_static::lazy_static;
use log::{error, info, warn};
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex =
        Regex::new(r"[^A-Za-z0-9._-]").expect("filename pattern");
}

#[derive(Default)]
struct ComplaintForm {
    vehicle_no: Option<String>,
    violation_type: Option<String>,
    location: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    date: Option<String>,
    time: Option<String>,
    state: Option<String>,
    comment: Option<String>,
}

pub async fn process(
    config: web::Data<AppConfig>,
    store: web::Data<ComplaintStore>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let complaint_id = Uuid::new_v4().to_string();
    let (form, file_path) = read_submission(payload, &complaint_id, &config).await?;

    let Some(vehicle_no) = required_vehicle_no(&form) else {
        // The media field may have streamed to disk before the text fields
        // arrived; a rejected submission must not leave an orphan behind.
        if let Some(saved) = &file_path {
            let orphan = config.static_root.join(saved);
            if let Err(err) = fs::remove_file(&orphan) {
                warn!("Could not remove orphaned upload {}: {}", orphan.display(), err);
            }
        }
        return Err(AppError::Validation("Vehicle number is required.".to_string()));
    };

    let (date, time) = normalize_timestamp(form.date.as_deref(), form.time.as_deref(), Local::now());
    let (latitude, longitude) =
        parse_coordinates(form.latitude.as_deref(), form.longitude.as_deref());

    let complaint = Complaint {
        complaint_id: complaint_id.clone(),
        vehicle_no,
        violation_type: form.violation_type,
        location: form.location,
        latitude,
        longitude,
        date,
        time,
        state: form.state,
        comment: form.comment,
        file_path,
        status: Status::Open,
    };

    store.insert(&complaint)?;
    info!("Complaint {} saved to DB.", complaint_id);

    Ok(HttpResponse::Created().json(SubmitComplaintResponse {
        success: true,
        message: "Complaint registered successfully!".to_string(),
        complaint_id,
    }))
}

/// Walks the multipart stream once, dispatching on the field name. Returns
/// the collected text fields and the stored media path (relative to the
/// static root), if any.
async fn read_submission(
    mut payload: Multipart,
    complaint_id: &str,
    config: &AppConfig,
) -> Result<(ComplaintForm, Option<String>), AppError> {
    let mut form = ComplaintForm::default();
    let mut file_path = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("media") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                file_path = save_media(&mut field, &filename, complaint_id, config).await?;
            }
            Some(other) => {
                let value = read_text_field(&mut field).await?;
                match other {
                    "vehicle-no" => form.vehicle_no = Some(value),
                    "violation-type" => form.violation_type = Some(value),
                    "offence-location" => form.location = Some(value),
                    "latitude" => form.latitude = Some(value),
                    "longitude" => form.longitude = Some(value),
                    "date" => form.date = Some(value),
                    "time" => form.time = Some(value),
                    "state" => form.state = Some(value),
                    "comment" => form.comment = Some(value),
                    _ => {}
                }
            }
            None => {}
        }
    }

    Ok((form, file_path))
}

async fn read_text_field(field: &mut Field) -> Result<String, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

enum MediaWriteError {
    Multipart(MultipartError),
    Io(std::io::Error),
}

/// Streams the media field to `<upload dir>/<complaint_id><ext>`. Returns
/// the stored path relative to the static root, or `None` when the client
/// sent no usable filename or the disk write failed.
async fn save_media(
    field: &mut Field,
    client_filename: &str,
    complaint_id: &str,
    config: &AppConfig,
) -> Result<Option<String>, AppError> {
    let sanitized = sanitize_filename(client_filename);
    if sanitized.is_empty() {
        drain(field).await?;
        return Ok(None);
    }

    let extension = Path::new(&sanitized)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let unique_filename = format!("{}{}", complaint_id, extension);
    let target = config.upload_dir().join(&unique_filename);

    match write_field_to(field, &target).await {
        Ok(()) => {
            info!("File saved successfully: {}", target.display());
            Ok(Some(format!("{}/{}", config.upload_subdir, unique_filename)))
        }
        // The transport died mid-upload; the submission itself is bad.
        Err(MediaWriteError::Multipart(err)) => {
            let _ = fs::remove_file(&target);
            Err(err.into())
        }
        // Disk trouble must not fail the complaint.
        Err(MediaWriteError::Io(err)) => {
            error!("Error saving file {}: {}", sanitized, err);
            let _ = fs::remove_file(&target);
            drain(field).await?;
            Ok(None)
        }
    }
}

async fn write_field_to(field: &mut Field, target: &Path) -> Result<(), MediaWriteError> {
    let file = File::create(target).map_err(MediaWriteError::Io)?;
    let mut writer = BufWriter::new(file);
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(MediaWriteError::Multipart)?;
        writer.write_all(&chunk).map_err(MediaWriteError::Io)?;
    }
    writer.flush().map_err(MediaWriteError::Io)?;
    Ok(())
}

/// Consumes the rest of a field so the multipart stream stays parseable.
async fn drain(field: &mut Field) -> Result<(), AppError> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

/// The one required field. Whitespace-only input counts as missing.
fn required_vehicle_no(form: &ComplaintForm) -> Option<String> {
    form.vehicle_no.clone().filter(|v| !v.trim().is_empty())
}

/// Keeps only the final path component and characters safe for a filename,
/// then trims dots so traversal sequences cannot survive. An empty result
/// means "treat as no file".
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    UNSAFE_FILENAME_CHARS
        .replace_all(base, "")
        .trim_matches('.')
        .to_string()
}

/// `YYYY-MM-DD` input becomes `DD-MM-YYYY`; anything else is stored
/// verbatim with a warning.
fn normalize_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d-%m-%Y").to_string(),
        Err(_) => {
            warn!("Received unexpected date format: {}", raw);
            raw.to_string()
        }
    }
}

/// Date and time travel together: if either is missing, both are replaced
/// by the server's clock.
fn normalize_timestamp(
    date: Option<&str>,
    time: Option<&str>,
    now: DateTime<Local>,
) -> (String, String) {
    let date = date.filter(|d| !d.is_empty()).map(normalize_date);
    let time = time.filter(|t| !t.is_empty());
    match (date, time) {
        (Some(date), Some(time)) => (date, time.to_string()),
        _ => (
            now.format("%d-%m-%Y").to_string(),
            now.format("%H:%M").to_string(),
        ),
    }
}

/// Missing coordinates are individually absent; a non-numeric value poisons
/// the pair, so the store never holds half a location.
fn parse_coordinates(latitude: Option<&str>, longitude: Option<&str>) -> (Option<f64>, Option<f64>) {
    let parse = |value: Option<&str>| -> Result<Option<f64>, std::num::ParseFloatError> {
        match value {
            Some(raw) if !raw.is_empty() => raw.parse::<f64>().map(Some),
            _ => Ok(None),
        }
    };
    match (parse(latitude), parse(longitude)) {
        (Ok(lat), Ok(lon)) => (lat, lon),
        _ => {
            warn!(
                "Received invalid latitude ({:?}) or longitude ({:?}). Storing as absent.",
                latitude, longitude
            );
            (None, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    #[test]
    fn iso_date_is_reformatted_for_display() {
        assert_eq!(normalize_date("2024-03-05"), "05-03-2024");
        assert_eq!(normalize_date("1999-12-31"), "31-12-1999");
    }

    #[test]
    fn unparsable_date_is_stored_verbatim() {
        assert_eq!(normalize_date("03/05/2024"), "03/05/2024");
        assert_eq!(normalize_date("yesterday"), "yesterday");
    }

    #[test]
    fn missing_date_or_time_substitutes_both_from_the_clock() {
        let now = fixed_now();
        assert_eq!(
            normalize_timestamp(None, Some("09:15"), now),
            ("05-03-2024".to_string(), "14:30".to_string())
        );
        assert_eq!(
            normalize_timestamp(Some("2024-01-01"), None, now),
            ("05-03-2024".to_string(), "14:30".to_string())
        );
        assert_eq!(
            normalize_timestamp(Some(""), Some(""), now),
            ("05-03-2024".to_string(), "14:30".to_string())
        );
    }

    #[test]
    fn supplied_date_and_time_pass_through_normalized() {
        let now = fixed_now();
        assert_eq!(
            normalize_timestamp(Some("2024-01-02"), Some("09:15"), now),
            ("02-01-2024".to_string(), "09:15".to_string())
        );
        // An unparsable date is kept raw, so the clock is not substituted.
        assert_eq!(
            normalize_timestamp(Some("soon"), Some("09:15"), now),
            ("soon".to_string(), "09:15".to_string())
        );
    }

    #[test]
    fn coordinates_parse_as_a_pair() {
        assert_eq!(
            parse_coordinates(Some("12.97"), Some("77.59")),
            (Some(12.97), Some(77.59))
        );
    }

    #[test]
    fn non_numeric_coordinate_poisons_the_pair() {
        assert_eq!(parse_coordinates(Some("12.97"), Some("east")), (None, None));
        assert_eq!(parse_coordinates(Some("north"), Some("77.59")), (None, None));
    }

    #[test]
    fn empty_coordinates_are_individually_absent() {
        assert_eq!(parse_coordinates(None, None), (None, None));
        assert_eq!(parse_coordinates(Some(""), Some("77.59")), (None, Some(77.59)));
        assert_eq!(parse_coordinates(Some("12.97"), None), (Some(12.97), None));
    }

    #[test]
    fn missing_or_blank_vehicle_no_is_rejected() {
        let mut form = ComplaintForm::default();
        assert_eq!(required_vehicle_no(&form), None);

        form.vehicle_no = Some("".to_string());
        assert_eq!(required_vehicle_no(&form), None);

        form.vehicle_no = Some("   ".to_string());
        assert_eq!(required_vehicle_no(&form), None);

        form.vehicle_no = Some("KA01AB1234".to_string());
        assert_eq!(required_vehicle_no(&form), Some("KA01AB1234".to_string()));
    }

    #[test]
    fn filename_sanitization_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "myphoto1.jpg");
        assert_eq!(sanitize_filename("...."), "");
        assert_eq!(sanitize_filename(""), "");
    }
}
