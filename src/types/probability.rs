//! Classifier output types: DiagnosisLabel and ClassProbabilityVector

use serde::{Deserialize, Serialize, Serializer};

/// Diagnosis classes in classifier index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosisLabel {
    /// Class 0: normal / other (fatigue, common cold)
    Normal,
    /// Class 1
    Dengue,
    /// Class 2
    Malaria,
}

impl DiagnosisLabel {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Dengue, Self::Malaria];

    /// Map a classifier class index, `None` outside `{0, 1, 2}`.
    pub const fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Normal),
            1 => Some(Self::Dengue),
            2 => Some(Self::Malaria),
            _ => None,
        }
    }

    pub const fn class_index(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Dengue => 1,
            Self::Malaria => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Dengue => "Dengue",
            Self::Malaria => "Malaria",
        }
    }
}

impl std::fmt::Display for DiagnosisLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialized as the bare class index (`0 | 1 | 2`) on the wire.
impl Serialize for DiagnosisLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.class_index())
    }
}

/// Per-class probabilities `(normal, dengue, malaria)` for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilityVector {
    pub normal: f64,
    pub dengue: f64,
    pub malaria: f64,
}

impl ClassProbabilityVector {
    pub const fn new(normal: f64, dengue: f64, malaria: f64) -> Self {
        Self {
            normal,
            dengue,
            malaria,
        }
    }

    /// Build from a raw classifier output.
    ///
    /// Missing trailing components are 0.0, components past the third are
    /// ignored. Returns `None` for an empty slice.
    pub fn from_raw(raw: &[f64]) -> Option<Self> {
        let normal = *raw.first()?;
        let dengue = raw.get(1).copied().unwrap_or(0.0);
        let malaria = raw.get(2).copied().unwrap_or(0.0);
        Some(Self::new(normal, dengue, malaria))
    }

    /// Max of the disease probabilities. Drives both severity and advice.
    pub fn risk(&self) -> f64 {
        self.dengue.max(self.malaria)
    }

    pub const fn for_label(&self, label: DiagnosisLabel) -> f64 {
        match label {
            DiagnosisLabel::Normal => self.normal,
            DiagnosisLabel::Dengue => self.dengue,
            DiagnosisLabel::Malaria => self.malaria,
        }
    }

    /// Arg-max class, first index wins ties.
    pub fn argmax(&self) -> DiagnosisLabel {
        let mut best = DiagnosisLabel::Normal;
        for label in DiagnosisLabel::ALL {
            if self.for_label(label) > self.for_label(best) {
                best = label;
            }
        }
        best
    }

    pub fn sum(&self) -> f64 {
        self.normal + self.dengue + self.malaria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_full() {
        let p = ClassProbabilityVector::from_raw(&[0.05, 0.9, 0.05]).unwrap();
        assert_eq!(p, ClassProbabilityVector::new(0.05, 0.9, 0.05));
    }

    #[test]
    fn test_from_raw_pads_missing_components() {
        let p = ClassProbabilityVector::from_raw(&[0.6, 0.4]).unwrap();
        assert_eq!(p.malaria, 0.0);
        assert_eq!(p.dengue, 0.4);

        let p = ClassProbabilityVector::from_raw(&[1.0]).unwrap();
        assert_eq!(p.dengue, 0.0);
        assert_eq!(p.malaria, 0.0);
    }

    #[test]
    fn test_from_raw_empty() {
        assert!(ClassProbabilityVector::from_raw(&[]).is_none());
    }

    #[test]
    fn test_from_raw_ignores_extra_components() {
        let p = ClassProbabilityVector::from_raw(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(p.malaria, 0.3);
    }

    #[test]
    fn test_risk_ignores_normal() {
        let a = ClassProbabilityVector::new(0.9, 0.05, 0.05);
        let b = ClassProbabilityVector::new(0.0, 0.05, 0.05);
        assert_eq!(a.risk(), b.risk());
        assert_eq!(ClassProbabilityVector::new(0.1, 0.3, 0.6).risk(), 0.6);
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        let p = ClassProbabilityVector::new(0.4, 0.4, 0.2);
        assert_eq!(p.argmax(), DiagnosisLabel::Normal);
        let p = ClassProbabilityVector::new(0.2, 0.4, 0.4);
        assert_eq!(p.argmax(), DiagnosisLabel::Dengue);
    }

    #[test]
    fn test_label_index_mapping() {
        for label in DiagnosisLabel::ALL {
            assert_eq!(
                DiagnosisLabel::from_class_index(label.class_index() as usize),
                Some(label)
            );
        }
        assert_eq!(DiagnosisLabel::from_class_index(3), None);
    }

    #[test]
    fn test_label_serializes_as_index() {
        let json = serde_json::to_string(&DiagnosisLabel::Malaria).unwrap();
        assert_eq!(json, "2");
    }
}
