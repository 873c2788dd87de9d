use std::collections::HashMap;

use super::{EntityId, Examination, ExaminationFile, MedicalRecord, Patient, Prescription};

/// An examination with its owning patient and children.
#[derive(Debug, Clone, PartialEq)]
pub struct ExaminationDetails {
    /// The examination itself.
    pub examination: Examination,
    /// The owning patient.
    pub patient: Patient,
    /// Prescriptions issued during the examination, ordered by id.
    pub prescriptions: Vec<Prescription>,
    /// Attached files, ordered by id.
    pub files: Vec<ExaminationFile>,
}

impl ExaminationDetails {
    /// Groups batch-loaded children under their examinations.
    ///
    /// Output follows the order of `examinations`. Children whose
    /// examination is absent from the list are dropped.
    pub fn assemble(
        patient: &Patient,
        examinations: Vec<Examination>,
        prescriptions: Vec<Prescription>,
        files: Vec<ExaminationFile>,
    ) -> Vec<ExaminationDetails> {
        let mut prescriptions_by_exam: HashMap<EntityId, Vec<Prescription>> = HashMap::new();
        for prescription in prescriptions {
            prescriptions_by_exam
                .entry(prescription.examination_id)
                .or_default()
                .push(prescription);
        }

        let mut files_by_exam: HashMap<EntityId, Vec<ExaminationFile>> = HashMap::new();
        for file in files {
            files_by_exam
                .entry(file.examination_id)
                .or_default()
                .push(file);
        }

        examinations
            .into_iter()
            .map(|examination| {
                let id = examination.id;
                ExaminationDetails {
                    examination,
                    patient: patient.clone(),
                    prescriptions: prescriptions_by_exam.remove(&id).unwrap_or_default(),
                    files: files_by_exam.remove(&id).unwrap_or_default(),
                }
            })
            .collect()
    }
}

/// A patient with every medical record and examination they own.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDetails {
    /// The patient.
    pub patient: Patient,
    /// Medical records, ordered by id.
    pub medical_records: Vec<MedicalRecord>,
    /// Examinations with their children, ordered by id.
    pub examinations: Vec<ExaminationDetails>,
}
