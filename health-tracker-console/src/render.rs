use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Table};
use health_tracker_core::{DoctorData, HealthRecordData, TipCategory};

/// A table of readings with the newest on top
pub fn history_table(records: &[HealthRecordData]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date of Entry", "Weight", "Blood Pressure", "Steps"]);

    for record in records {
        table.add_row(vec![
            record
                .date_logged
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            format!("{} kg", record.weight),
            record.blood_pressure.to_string(),
            record.steps.to_string(),
        ]);
    }

    table
}

pub fn doctors_table(doctors: &[DoctorData]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Doctor Name", "Specialty"]);

    for doctor in doctors {
        table.add_row(vec![
            doctor.id.to_string(),
            format!("Dr. {}", doctor.name),
            doctor.specialty.to_string(),
        ]);
    }

    table
}

pub fn doctor_card(doctor: &DoctorData) -> Vec<String> {
    vec![
        "Selected Doctor's Contact Information:".to_string(),
        format!("Name: Dr. {}", doctor.name),
        format!("Specialty: {}", doctor.specialty),
        format!("Email: {}", doctor.email),
        format!("Phone: {}", doctor.phone),
    ]
}

pub fn tip_lines(category: TipCategory) -> Vec<String> {
    category.tips().iter().map(|tip| format!("* {tip}")).collect()
}
