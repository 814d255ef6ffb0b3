use crate::types::criteria::Criteria;
use crate::types::grade::Grade;
use crate::types::pollutant::Pollutant;

/// Combines per-pollutant grades into the overall grade.
///
/// The result is the most severe grade among the pollutants selected by
/// `criteria` whose grade is known. `Unknown` grades never take part, and the
/// result is `Unknown` when no selected pollutant has a known grade.
///
/// # Examples
///
/// ```rust
/// use airkorea::{combine, Criteria, Grade};
///
/// let criteria = Criteria::parse("khai,pm10");
/// assert_eq!(combine(&criteria, Grade::Good, Grade::Poor, Grade::Unknown), Grade::Poor);
/// assert_eq!(combine(&Criteria::none(), Grade::Poor, Grade::Poor, Grade::Poor), Grade::Unknown);
/// ```
pub fn combine(criteria: &Criteria, khai: Grade, pm10: Grade, pm25: Grade) -> Grade {
    [
        (Pollutant::Khai, khai),
        (Pollutant::Pm10, pm10),
        (Pollutant::Pm25, pm25),
    ]
    .into_iter()
    .filter(|(pollutant, grade)| criteria.includes(*pollutant) && grade.is_known())
    .map(|(_, grade)| grade)
    .max()
    .unwrap_or(Grade::Unknown)
}
