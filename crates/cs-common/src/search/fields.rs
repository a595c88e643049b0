//! Attribute paths of the candidate profile document.

pub const FULL_NAME: &str = "personalInfo.fullName";
pub const BIO: &str = "personalInfo.bio";
pub const CURRENT_CITY: &str = "personalInfo.currentCity";
pub const PINCODE: &str = "personalInfo.pincode";
pub const GENDER: &str = "personalInfo.gender";
pub const DATE_OF_BIRTH: &str = "personalInfo.dateOfBirth";
pub const DISABILITY_STATUS: &str = "personalInfo.disabilityStatus";
pub const CATEGORY: &str = "personalInfo.category";
pub const LANGUAGE: &str = "personalInfo.languages.language";
pub const LANGUAGE_FLUENCY: &str = "personalInfo.languages.fluency";
pub const PROFILE_PICTURE: &str = "personalInfo.profilePicture";

pub const JOB_TITLE: &str = "professional.currentJobTitle";
pub const COMPANY: &str = "professional.currentCompany";
pub const SKILLS: &str = "professional.skills";
pub const KEY_SKILLS: &str = "professional.keySkills";
pub const TOTAL_EXPERIENCE: &str = "professional.totalExperience";
pub const CURRENT_SALARY: &str = "professional.currentSalary";
pub const NOTICE_PERIOD: &str = "professional.noticePeriod";
pub const COMPANY_TYPE: &str = "professional.companyType";
pub const INDUSTRY: &str = "professional.industry";
pub const DEPARTMENT: &str = "professional.department";
pub const CERTIFICATIONS: &str = "professional.certifications";

pub const EDUCATION_LEVEL: &str = "education.level";
pub const DEGREE: &str = "education.degree";
pub const SPECIALIZATION: &str = "education.specialization";
pub const INSTITUTION: &str = "education.institution";
pub const EDUCATION_STATUS: &str = "education.educationStatus";
/// Where the legacy search endpoint has always read education status from.
pub const LEGACY_EDUCATION_STATUS: &str = "education.status";
pub const MARKS: &str = "education.percentage";

pub const PREFERRED_LOCATIONS: &str = "preferences.preferredLocations";
pub const EXPECTED_SALARY: &str = "preferences.expectedSalary";
pub const EMPLOYMENT_TYPE: &str = "preferences.employmentType";
pub const JOB_TYPE: &str = "preferences.jobType";
pub const WORK_MODE: &str = "preferences.workMode";
pub const SHIFT_TYPE: &str = "preferences.shiftType";
pub const ASSETS: &str = "preferences.assets";
pub const WILLING_TO_RELOCATE: &str = "preferences.willingToRelocate";

pub const RESUME: &str = "documents.resume";

pub const IS_ACTIVE: &str = "profileStatus.isActive";
pub const IS_VERIFIED: &str = "profileStatus.isVerified";
pub const COMPLETION: &str = "profileStatus.completionPercentage";

pub const ADMIN_RATING: &str = "adminRating";
pub const ADMIN_TAGS: &str = "adminTags";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Text attributes searched by free-text `keywords`.
pub const KEYWORD_FIELDS: [&str; 8] = [
    FULL_NAME,
    JOB_TITLE,
    COMPANY,
    SKILLS,
    KEY_SKILLS,
    DEGREE,
    INSTITUTION,
    BIO,
];

/// Attributes `excludeKeywords` is checked against.
pub const EXCLUDE_KEYWORD_FIELDS: [&str; 2] = [SKILLS, JOB_TITLE];

pub const ANYWHERE_IN_INDIA: &str = "Anywhere in India";

/// A profile at or above this completion counts as "complete".
pub const COMPLETE_PROFILE_THRESHOLD: i64 = 100;
