//! Subcommands mapped onto the resource services.

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Subcommand};
use dental_core::{
    CreateOutcome, ListParams, Patient, PatientService, RecordId, SqlitePatientStore,
    SqliteTreatmentStore, Treatment, TreatmentService,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::error::Error;
use std::str::FromStr;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List patients.
    Patients(PatientListArgs),
    /// List treatments.
    Treatments(TreatmentListArgs),
    /// List distinct treatment specialists.
    Specialists,
    /// Register a patient.
    PatientAdd {
        name: String,
        email: String,
        /// `YYYY-MM-DD` or `YYYY-MM-DD HH:MM[:SS]`.
        #[arg(value_parser = parse_appointment)]
        appointment: NaiveDateTime,
    },
    /// Register a treatment.
    TreatmentAdd {
        name: String,
        specialist: String,
        #[arg(value_parser = parse_price)]
        price: Decimal,
    },
    DeletePatient {
        id: RecordId,
    },
    DeleteTreatment {
        id: RecordId,
    },
    /// Print the core version.
    Version,
}

#[derive(Debug, Args)]
pub struct PatientListArgs {
    #[arg(long)]
    search: Option<String>,
    /// Appointment date; unparseable values are ignored.
    #[arg(long)]
    date: Option<String>,
    /// name_asc|name_desc|date_asc|date_desc
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

#[derive(Debug, Args)]
pub struct TreatmentListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    specialist: Option<String>,
    /// name_asc|name_desc|price_asc|price_desc
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

impl PatientListArgs {
    fn params(&self) -> ListParams {
        ListParams {
            search: self.search.clone(),
            date: self.date.clone(),
            sort: self.sort.clone(),
            limit: self.limit,
            offset: self.offset,
            ..ListParams::default()
        }
    }
}

impl TreatmentListArgs {
    fn params(&self) -> ListParams {
        ListParams {
            search: self.search.clone(),
            filter: self.specialist.clone(),
            sort: self.sort.clone(),
            limit: self.limit,
            offset: self.offset,
            ..ListParams::default()
        }
    }
}

/// Runs `command` against `conn`, returning the lines to print.
pub fn run(command: &Command, conn: &Connection) -> Result<Vec<String>, Box<dyn Error>> {
    let lines = match command {
        Command::Patients(args) => patients(conn)?
            .list(&args.params())?
            .iter()
            .map(patient_line)
            .collect(),
        Command::Treatments(args) => treatments(conn)?
            .list(&args.params())?
            .iter()
            .map(treatment_line)
            .collect(),
        Command::Specialists => {
            let mut specialists = treatments(conn)?.filter_options()?;
            specialists.sort();
            specialists
        }
        Command::PatientAdd {
            name,
            email,
            appointment,
        } => {
            let candidate = Patient::new(name.as_str(), email.as_str(), *appointment);
            match patients(conn)?.create(&candidate)? {
                CreateOutcome::Created(created) => vec![patient_line(&created)],
                CreateOutcome::ValidationFailed(errors) => {
                    return Err(format!("invalid patient: {errors}").into())
                }
            }
        }
        Command::TreatmentAdd {
            name,
            specialist,
            price,
        } => {
            let candidate = Treatment::new(name.as_str(), specialist.as_str(), *price);
            match treatments(conn)?.create(&candidate)? {
                CreateOutcome::Created(created) => vec![treatment_line(&created)],
                CreateOutcome::ValidationFailed(errors) => {
                    return Err(format!("invalid treatment: {errors}").into())
                }
            }
        }
        Command::DeletePatient { id } => {
            patients(conn)?.delete(*id)?;
            vec![format!("deleted patient {id}")]
        }
        Command::DeleteTreatment { id } => {
            treatments(conn)?.delete(*id)?;
            vec![format!("deleted treatment {id}")]
        }
        Command::Version => vec![format!("dental_core {}", dental_core::core_version())],
    };
    Ok(lines)
}

fn patients(conn: &Connection) -> Result<PatientService<SqlitePatientStore<'_>>, Box<dyn Error>> {
    Ok(PatientService::new(SqlitePatientStore::try_new(conn)?))
}

fn treatments(
    conn: &Connection,
) -> Result<TreatmentService<SqliteTreatmentStore<'_>>, Box<dyn Error>> {
    Ok(TreatmentService::new(SqliteTreatmentStore::try_new(conn)?))
}

fn patient_line(patient: &Patient) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        patient.id.unwrap_or_default(),
        patient.name,
        patient.email,
        patient.appointment_date.format("%Y-%m-%d %H:%M")
    )
}

fn treatment_line(treatment: &Treatment) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        treatment.id.unwrap_or_default(),
        treatment.name,
        treatment.specialist,
        treatment.price
    )
}

fn parse_appointment(raw: &str) -> Result<NaiveDateTime, String> {
    let text = raw.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(value);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("`{raw}` is not a date or date-time"))
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|err| format!("`{raw}` is not a price: {err}"))
}
