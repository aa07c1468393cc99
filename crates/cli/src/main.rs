use clap::{Parser, Subcommand};
use pms_core::{
    bmi, CoreConfig, JsonFileStore, Patient, PatientDraft, PatientError, PatientService, PatientUpdate, Verdict,
    DEFAULT_RECORDS_FILE,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pms")]
#[command(about = "Patient records CLI")]
struct Cli {
    /// JSON records file
    #[arg(long, global = true, env = "PATIENT_RECORDS_FILE", default_value = DEFAULT_RECORDS_FILE)]
    file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient as JSON
    Show {
        /// Patient ID
        id: String,
    },
    /// List patients sorted by height, weight or bmi
    Sort {
        /// Field to sort by (height, weight, bmi)
        sort_by: String,
        /// Sort order (asc, desc)
        #[arg(long)]
        order: Option<String>,
    },
    /// Create a patient
    Create {
        id: String,
        name: String,
        city: String,
        age: i64,
        /// male, female or others
        gender: String,
        /// Height in metres
        height: f64,
        /// Weight in kilograms
        weight: f64,
    },
    /// Update some fields of a patient
    Edit {
        /// Patient ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Delete a patient
    Delete {
        /// Patient ID
        id: String,
    },
    /// Compute BMI and verdict without touching the records file
    Bmi {
        /// Height in metres
        height: f64,
        /// Weight in kilograms
        weight: f64,
    },
}

fn summary(patient: &Patient) -> String {
    format!(
        "ID: {}, Name: {}, City: {}, Age: {}, Gender: {}, BMI: {:.2} ({})",
        patient.id(),
        patient.name(),
        patient.city(),
        patient.age(),
        patient.gender(),
        patient.bmi(),
        patient.verdict()
    )
}

fn print_all(patients: &[Patient]) {
    if patients.is_empty() {
        println!("No patients found.");
    }
    for patient in patients {
        println!("{}", summary(patient));
    }
}

/// Validate the records path and open the store behind it.
fn open(file: PathBuf) -> Result<PatientService<JsonFileStore>, PatientError> {
    let cfg = CoreConfig::new(file)?;
    Ok(PatientService::new(JsonFileStore::new(cfg.records_file())))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'pms --help' for commands");
        return Ok(());
    };

    match command {
        Commands::Bmi { height, weight } => {
            let value = bmi(height, weight);
            println!("BMI: {:.2} ({})", value, Verdict::from_bmi(value));
        }
        Commands::List => print_all(&open(cli.file)?.list()?),
        Commands::Show { id } => {
            let patient = open(cli.file)?.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&patient.view())?);
        }
        Commands::Sort { sort_by, order } => {
            print_all(&open(cli.file)?.sort(&sort_by, order.as_deref())?);
        }
        Commands::Create {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        } => {
            let patient = open(cli.file)?.create(PatientDraft {
                id: Some(id),
                name: Some(name),
                city: Some(city),
                age: Some(age),
                gender: Some(gender),
                height: Some(height),
                weight: Some(weight),
            })?;
            println!("Created {}", summary(&patient));
        }
        Commands::Edit {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        } => {
            // Flags that were not passed stay absent from the update.
            let update = PatientUpdate {
                name: name.map(Some),
                city: city.map(Some),
                age: age.map(Some),
                gender: gender.map(Some),
                height: height.map(Some),
                weight: weight.map(Some),
            };
            if update.is_empty() {
                println!("Nothing to update for {}", id);
                return Ok(());
            }
            let patient = open(cli.file)?.update(&id, update)?;
            println!("Updated {}", summary(&patient));
        }
        Commands::Delete { id } => {
            open(cli.file)?.delete(&id)?;
            println!("Deleted patient {}", id);
        }
    }

    Ok(())
}
