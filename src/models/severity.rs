use serde::{Deserialize, Serialize};

/// Diabetic retinopathy grade returned by the model. 0 = no disease,
/// 4 = proliferative. Values outside 0..=4 are carried as-is and resolve to
/// [`ReportEntry::UNKNOWN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityCode(pub i64);

impl SeverityCode {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 4;

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }

    /// Predefined report entry, or the unknown placeholder.
    pub fn entry(&self) -> &'static ReportEntry {
        ReportEntry::for_code(self.0)
    }
}

impl From<i64> for SeverityCode {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SeverityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Condition title plus description/recommendation text for one severity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub title: &'static str,
    pub description: &'static str,
}

/// Indexed by severity code.
static REPORT_ENTRIES: [ReportEntry; 5] = [
    ReportEntry {
        title: "No Diabetic Retinopathy (No DR)",
        description: "Your retinal scan shows no signs of diabetic retinopathy. This is excellent news. \n\n\
Recommendation: Continue with your annual eye screenings and maintain good control of your blood sugar levels, blood pressure, and cholesterol.",
    },
    ReportEntry {
        title: "Mild Diabetic Retinopathy",
        description: "The scan indicates early signs of diabetic retinopathy, such as microaneurysms (tiny bulges in blood vessels). Vision is not usually affected at this stage.\n\n\
Recommendation: It is crucial to manage your diabetes and blood pressure strictly to prevent progression. More frequent eye exams may be recommended by your doctor.",
    },
    ReportEntry {
        title: "Moderate Diabetic Retinopathy",
        description: "There is further progression of the disease with more significant damage to the blood vessels in the retina. There might be some vision impairment.\n\n\
Recommendation: Your condition requires close monitoring. Your ophthalmologist may suggest treatments to slow the disease. Strict management of your diabetes is essential.",
    },
    ReportEntry {
        title: "Severe Diabetic Retinopathy",
        description: "The scan shows extensive vessel blockage and areas of the retina that are not receiving adequate blood flow. There is a high risk of vision loss.\n\n\
Recommendation: This stage requires prompt and active treatment from an eye care specialist. Treatments like laser therapy may be necessary to save your vision.",
    },
    ReportEntry {
        title: "Proliferative Diabetic Retinopathy (PDR)",
        description: "This is the most advanced stage of the disease, where new, fragile blood vessels grow on the retina. These can leak blood, leading to severe vision loss or blindness.\n\n\
Recommendation: Immediate medical attention from an ophthalmologist is critical. Advanced treatments, including laser surgery and injections, are required to prevent permanent blindness.",
    },
];

impl ReportEntry {
    pub const UNKNOWN: ReportEntry = ReportEntry {
        title: "Unknown",
        description: "Could not determine the condition details.",
    };

    /// Look up the entry for any integer code. Never fails.
    pub fn for_code(code: i64) -> &'static ReportEntry {
        usize::try_from(code)
            .ok()
            .and_then(|idx| REPORT_ENTRIES.get(idx))
            .unwrap_or(&Self::UNKNOWN)
    }

    /// All predefined entries in code order.
    pub fn predefined() -> &'static [ReportEntry] {
        &REPORT_ENTRIES
    }
}
