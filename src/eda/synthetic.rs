//! Fixed summary used when no dataset source is available

use crate::eda::summary::{ClassDistribution, EdaSummary, MissingValues, TextLength};
use crate::types::posting::TextField;

const REAL_WORDS: [(&str, u64); 12] = [
    ("and", 9120),
    ("the", 8410),
    ("to", 7655),
    ("of", 6980),
    ("team", 3120),
    ("experience", 2870),
    ("we", 2640),
    ("work", 2415),
    ("company", 2190),
    ("customers", 1635),
    ("development", 1480),
    ("sales", 1210),
];

const FAKE_WORDS: [(&str, u64); 12] = [
    ("and", 610),
    ("the", 545),
    ("to", 512),
    ("work", 288),
    ("home", 236),
    ("data", 204),
    ("entry", 188),
    ("earn", 141),
    ("cash", 126),
    ("weekly", 112),
    ("administrative", 97),
    ("oil", 83),
];

const REAL_LENGTHS: [usize; 10] = [1240, 1875, 2310, 2650, 2990, 3320, 3580, 4105, 4720, 5630];
const FAKE_LENGTHS: [usize; 6] = [310, 690, 1150, 1480, 2260, 3105];

const REAL_MISSING: [(TextField, u64); 5] = [
    (TextField::Title, 0),
    (TextField::Description, 0),
    (TextField::CompanyProfile, 2721),
    (TextField::Requirements, 2541),
    (TextField::Benefits, 6848),
];

const FAKE_MISSING: [(TextField, u64); 5] = [
    (TextField::Title, 0),
    (TextField::Description, 1),
    (TextField::CompanyProfile, 587),
    (TextField::Requirements, 154),
    (TextField::Benefits, 364),
];

/// Demonstration summary shaped like the real dataset
pub fn synthetic_summary() -> EdaSummary {
    let mut missing_values = MissingValues::default();
    for (field, count) in REAL_MISSING {
        missing_values.real.insert(field.as_str().to_string(), count);
    }
    for (field, count) in FAKE_MISSING {
        missing_values.fake.insert(field.as_str().to_string(), count);
    }

    let text_lengths = REAL_LENGTHS
        .iter()
        .map(|&length| TextLength { length, is_fake: false })
        .chain(
            FAKE_LENGTHS
                .iter()
                .map(|&length| TextLength { length, is_fake: true }),
        )
        .collect();

    let table = |words: &[(&str, u64)]| -> Vec<(String, u64)> {
        words.iter().map(|&(w, c)| (w.to_string(), c)).collect()
    };

    EdaSummary {
        class_distribution: ClassDistribution {
            real: 17014,
            fake: 866,
            total: 17880,
        },
        text_lengths,
        missing_values,
        real_words: table(&REAL_WORDS),
        fake_words: table(&FAKE_WORDS),
    }
}
