//! Student verification gate.
//!
//! The `is_verified` flag is written in exactly two places: an explicit grant
//! or revocation by a same-college placement officer, and the automatic
//! revocation that fires when a trust-sensitive profile field changes. Every
//! student profile write must go through [`VerificationGate::apply_update`] so
//! the trust-sensitive field set stays defined once.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{StudentId, StudentProfile, TnpId};
use super::error::{ForbiddenReason, PlacementError};
use super::repository::PlacementStore;

/// Editable student profile fields the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Course,
    College,
    Cgpa,
    YearOfCompletion,
    RegistrationNumber,
    TenthMarks,
    TwelfthMarks,
    LastSemesterMarksheet,
    ProfileAvatar,
    Mobile,
    Email,
    AreaOfInterest,
}

impl ProfileField {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileField::Course => "course",
            ProfileField::College => "college",
            ProfileField::Cgpa => "cgpa",
            ProfileField::YearOfCompletion => "year_of_completion",
            ProfileField::RegistrationNumber => "registration_number",
            ProfileField::TenthMarks => "tenth_marks",
            ProfileField::TwelfthMarks => "twelfth_marks",
            ProfileField::LastSemesterMarksheet => "last_semester_marksheet",
            ProfileField::ProfileAvatar => "profile_avatar",
            ProfileField::Mobile => "mobile",
            ProfileField::Email => "email",
            ProfileField::AreaOfInterest => "area_of_interest",
        }
    }

    /// Fields whose mutation silently revokes an existing verification.
    pub const fn is_trust_sensitive(self) -> bool {
        matches!(
            self,
            ProfileField::Course
                | ProfileField::College
                | ProfileField::Cgpa
                | ProfileField::YearOfCompletion
                | ProfileField::RegistrationNumber
                | ProfileField::TenthMarks
                | ProfileField::TwelfthMarks
                | ProfileField::LastSemesterMarksheet
                | ProfileField::ProfileAvatar
        )
    }
}

/// Partial profile update submitted by a student. Only set fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_completion: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_marks: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twelfth_marks: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_semester_marksheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_of_interest: Option<String>,
}

impl StudentProfileUpdate {
    pub fn changed_fields(&self) -> Vec<ProfileField> {
        let mut changed = Vec::new();
        if self.course.is_some() {
            changed.push(ProfileField::Course);
        }
        if self.cgpa.is_some() {
            changed.push(ProfileField::Cgpa);
        }
        if self.year_of_completion.is_some() {
            changed.push(ProfileField::YearOfCompletion);
        }
        if self.registration_number.is_some() {
            changed.push(ProfileField::RegistrationNumber);
        }
        if self.tenth_marks.is_some() {
            changed.push(ProfileField::TenthMarks);
        }
        if self.twelfth_marks.is_some() {
            changed.push(ProfileField::TwelfthMarks);
        }
        if self.last_semester_marksheet.is_some() {
            changed.push(ProfileField::LastSemesterMarksheet);
        }
        if self.profile_avatar.is_some() {
            changed.push(ProfileField::ProfileAvatar);
        }
        if self.mobile.is_some() {
            changed.push(ProfileField::Mobile);
        }
        if self.email.is_some() {
            changed.push(ProfileField::Email);
        }
        if self.area_of_interest.is_some() {
            changed.push(ProfileField::AreaOfInterest);
        }
        changed
    }
}

/// Stateless gate functions over student values. Persistence lives in
/// [`VerificationService`].
pub struct VerificationGate;

impl VerificationGate {
    /// Explicit grant or revocation by a placement officer. Officers may only
    /// touch students of their own college.
    pub fn set_verified(
        officer: &super::domain::TnpOfficer,
        mut student: StudentProfile,
        verified: bool,
        note: Option<String>,
    ) -> Result<StudentProfile, PlacementError> {
        if officer.college != student.college {
            return Err(ForbiddenReason::CrossCollege.into());
        }

        student.is_verified = verified;
        student.verified_by = verified.then(|| officer.id.clone());
        student.verification_note = note;
        Ok(student)
    }

    /// Write-side revocation: clears the flag when any changed field is
    /// trust-sensitive, and records which fields caused it. Non-sensitive
    /// changes leave verification untouched.
    pub fn on_profile_mutated(
        mut student: StudentProfile,
        changed: &[ProfileField],
    ) -> StudentProfile {
        let touched: Vec<&'static str> = changed
            .iter()
            .copied()
            .filter(|field| field.is_trust_sensitive())
            .map(ProfileField::label)
            .collect();

        if !touched.is_empty() && student.is_verified {
            student.is_verified = false;
            student.verified_by = None;
            student.verification_note =
                Some(format!("verification revoked: changed {}", touched.join(", ")));
        }

        student
    }

    /// Apply a partial update to a student value and route the change set
    /// through the revocation rule.
    pub fn apply_update(
        mut student: StudentProfile,
        update: &StudentProfileUpdate,
    ) -> StudentProfile {
        if let Some(course) = &update.course {
            student.course = course.clone();
        }
        if let Some(cgpa) = update.cgpa {
            student.cgpa = cgpa;
        }
        if let Some(year) = update.year_of_completion {
            student.year_of_completion = year;
        }
        if let Some(registration) = &update.registration_number {
            student.registration_number = registration.clone();
        }
        if let Some(marks) = update.tenth_marks {
            student.tenth_marks = Some(marks);
        }
        if let Some(marks) = update.twelfth_marks {
            student.twelfth_marks = Some(marks);
        }
        if let Some(marksheet) = &update.last_semester_marksheet {
            student.last_semester_marksheet = Some(marksheet.clone());
        }
        if let Some(avatar) = &update.profile_avatar {
            student.profile_avatar = Some(avatar.clone());
        }
        if let Some(mobile) = &update.mobile {
            student.mobile = mobile.clone();
        }
        if let Some(email) = &update.email {
            student.email = email.clone();
        }
        if let Some(interest) = &update.area_of_interest {
            student.area_of_interest = Some(interest.clone());
        }

        Self::on_profile_mutated(student, &update.changed_fields())
    }
}

/// Store-backed verification operations.
pub struct VerificationService<S> {
    store: Arc<S>,
}

impl<S> VerificationService<S>
where
    S: PlacementStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn set_verified(
        &self,
        tnp_id: &TnpId,
        student_id: &StudentId,
        verified: bool,
        note: Option<String>,
    ) -> Result<StudentProfile, PlacementError> {
        let student = self.store.transact(|tx| {
            let officer = tx.tnp(tnp_id).ok_or(PlacementError::Forbidden(
                ForbiddenReason::WrongRole("placement officer"),
            ))?;
            let student = tx
                .student(student_id)
                .ok_or(PlacementError::NotFound("student"))?;

            let updated = VerificationGate::set_verified(&officer, student, verified, note)?;
            tx.put_student(updated.clone());
            Ok::<_, PlacementError>(updated)
        })?;

        tracing::info!(
            student = %student.id.0,
            verified = student.is_verified,
            "verification flag updated"
        );
        Ok(student)
    }

    pub fn update_profile(
        &self,
        student_id: &StudentId,
        update: &StudentProfileUpdate,
    ) -> Result<StudentProfile, PlacementError> {
        let (student, was_verified) = self.store.transact(|tx| {
            let student = tx
                .student(student_id)
                .ok_or(PlacementError::NotFound("student"))?;
            let was_verified = student.is_verified;

            let updated = VerificationGate::apply_update(student, update);
            tx.put_student(updated.clone());
            Ok::<_, PlacementError>((updated, was_verified))
        })?;

        if was_verified && !student.is_verified {
            tracing::info!(student = %student.id.0, "verification revoked by profile edit");
        }
        Ok(student)
    }
}
