//! Student directory entities: students and their GPA records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    /// Portal account linked to this student, if any
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub program: String,
    /// Year of study, 1-based
    pub year: i16,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One term's GPA entry for a student
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GpaRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Term label, e.g. "2025-fall"
    #[schema(example = "2025-fall")]
    pub term: String,
    /// Grade point average on the 4.0 scale
    #[schema(example = 3.6)]
    pub gpa: f32,
    /// Credits earned during the term
    #[schema(example = 15)]
    pub credits: i16,
    pub recorded_at: DateTime<Utc>,
}

/// Student response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentResponse {
    /// Unique student identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Display name
    #[schema(example = "John Doe")]
    pub full_name: String,
    /// Contact email
    #[schema(example = "jdoe@students.example.edu")]
    pub email: String,
    /// Enrolled program
    #[schema(example = "Computer Science")]
    pub program: String,
    /// Year of study
    #[schema(example = 2)]
    pub year: i16,
    /// Enrollment date
    pub enrolled_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            full_name: student.full_name,
            email: student.email,
            program: student.program,
            year: student.year,
            enrolled_at: student.enrolled_at,
        }
    }
}

/// Student detail including academic history
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: StudentResponse,
    /// GPA records, most recent term first
    pub gpa_records: Vec<GpaRecord>,
}

/// Credit-weighted GPA average across records; `None` when no credits.
pub fn weighted_gpa(records: &[GpaRecord]) -> Option<f32> {
    let total_credits: i32 = records.iter().map(|r| i32::from(r.credits)).sum();
    if total_credits == 0 {
        return None;
    }
    let weighted: f32 = records
        .iter()
        .map(|r| r.gpa * f32::from(r.credits))
        .sum();
    Some(weighted / total_credits as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gpa: f32, credits: i16) -> GpaRecord {
        GpaRecord {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            term: "2025-fall".to_string(),
            gpa,
            credits,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn weighted_average_uses_credits() {
        let records = vec![record(4.0, 10), record(3.0, 30)];
        let avg = weighted_gpa(&records).unwrap();
        assert!((avg - 3.25).abs() < f32::EPSILON);
    }

    #[test]
    fn weighted_average_empty_is_none() {
        assert!(weighted_gpa(&[]).is_none());
        assert!(weighted_gpa(&[record(3.5, 0)]).is_none());
    }
}
