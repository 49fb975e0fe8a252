//! Triage policy: severity tier, greeting and advice
//!
//! Severity and advice are two separate decisions over the same risk value
//! with their own thresholds (see [`crate::types::thresholds`]). Keep them in
//! separate functions; the boundaries intentionally do not line up.

use crate::types::thresholds::{advice as advice_thresholds, severity as severity_thresholds};
use crate::types::{ClassProbabilityVector, DiagnosisLabel, DiseaseBreakdown, SeverityTier, TriageResult};

// Guidance texts (Arabic), one per advice table row.
pub const DENGUE_CRITICAL_ADVICE: &str = "حالة حرجة (اشتباه حمى الضنك): يُرجى التوجه إلى أقرب مستشفى أو طوارئ فوراً. تجنب تناول المسكنات التي تحتوي على الأسبرين أو الإيبوبروفين واستخدم الباراسيتامول فقط.";
pub const DENGUE_MODERATE_ADVICE: &str = "اشتباه باحتمالية متوسطة (حمى الضنك): يُنصح بزيارة الطبيب لإجراء فحص دم. احرص على شرب كميات وفيرة من السوائل والراحة التامة.";
pub const MALARIA_CRITICAL_ADVICE: &str = "حالة حرجة (اشتباه ملاريا): يُرجى التوجه للطوارئ لإجراء فحص ملاريا (Blood Film) وتلقي العلاج المضاد للملاريا فوراً.";
pub const MALARIA_MODERATE_ADVICE: &str = "اشتباه باحتمالية متوسطة (ملاريا): يُنصح بزيارة الطبيب لإجراء الفحوصات اللازمة لا سيما إذا كنت في منطقة يكثر فيها البعوض.";
pub const NORMAL_WATCHFUL_ADVICE: &str = "الوضع مستقر: الأعراض قد تكون ناتجة عن إرهاق أو زكام. نرجو مراقبة الأعراض وإذا تفاقمت الحمى يُرجى مراجعة الطبيب.";
pub const NORMAL_REASSURANCE_ADVICE: &str = "حفظك الله: الأعراض لا تشير إلى حمى الضنك أو الملاريا باحتمالية عالية. احرص على الراحة وتناول السوائل.";

/// Severity tier from risk. Both bounds are strict: 0.75 is Medium, 0.4 is Low.
pub fn severity_tier(risk: f64) -> SeverityTier {
    if risk > severity_thresholds::HIGH_RISK {
        SeverityTier::High
    } else if risk > severity_thresholds::MEDIUM_RISK {
        SeverityTier::Medium
    } else {
        SeverityTier::Low
    }
}

/// Advice text keyed on `(label, risk)`.
pub fn advice(label: DiagnosisLabel, risk: f64) -> &'static str {
    match label {
        DiagnosisLabel::Dengue if risk > advice_thresholds::CRITICAL_RISK => DENGUE_CRITICAL_ADVICE,
        DiagnosisLabel::Dengue => DENGUE_MODERATE_ADVICE,
        DiagnosisLabel::Malaria if risk > advice_thresholds::CRITICAL_RISK => MALARIA_CRITICAL_ADVICE,
        DiagnosisLabel::Malaria => MALARIA_MODERATE_ADVICE,
        DiagnosisLabel::Normal if risk > advice_thresholds::WATCHFUL_RISK => NORMAL_WATCHFUL_ADVICE,
        DiagnosisLabel::Normal => NORMAL_REASSURANCE_ADVICE,
    }
}

/// Greeting for the predicted label. Depends on the label only, never on risk.
pub fn greeting(label: DiagnosisLabel, patient_name: &str) -> String {
    match label {
        DiagnosisLabel::Dengue => {
            format!("أهلاً {patient_name}، المؤشرات تدل على احتمالية مرتفعة لحمى الضنك.")
        }
        DiagnosisLabel::Malaria => {
            format!("أهلاً {patient_name}، المؤشرات تدل على احتمالية مرتفعة للإصابة بالملاريا.")
        }
        DiagnosisLabel::Normal => format!(
            "أهلاً {patient_name}، تشير الأعراض إلى إرهاق أو نزلة برد عادية، الاحتمالية منخفضة للأمراض الخطيرة."
        ),
    }
}

/// Probability → percentage rounded to two decimals.
///
/// Goes through decimal formatting so the result is the correctly rounded
/// value of the exact binary product (`0.9 * 100` → `90.0`).
pub fn to_percent(probability: f64) -> f64 {
    let scaled = probability * 100.0;
    format!("{scaled:.2}").parse().unwrap_or(scaled)
}

pub fn breakdown(probabilities: &ClassProbabilityVector) -> DiseaseBreakdown {
    DiseaseBreakdown {
        dengue: to_percent(probabilities.dengue),
        malaria: to_percent(probabilities.malaria),
        normal: to_percent(probabilities.normal),
    }
}

/// Assemble the triage result. Pure and total.
pub fn evaluate(
    label: DiagnosisLabel,
    probabilities: ClassProbabilityVector,
    patient_name: &str,
) -> TriageResult {
    let risk = probabilities.risk();
    TriageResult {
        prediction: label,
        probability: to_percent(risk),
        message: greeting(label, patient_name),
        severity_level: severity_tier(risk),
        disease_breakdown: breakdown(&probabilities),
        medical_advice: advice(label, risk).to_string(),
        patient_name: patient_name.to_string(),
        probabilities,
    }
}
