use serde::{de, Deserialize, Deserializer};

/// Body of `POST /health_metric`
///
/// ```json
/// {
///   "data": {
///     "metrics": [
///       { "name": "sleep_analysis", "data": [...] },
///       { "name": "vo2_max", "data": [...] }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RootPayload {
    pub data: MetricsBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsBody {
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

/// One metric type and its samples
#[derive(Debug, Clone, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(default)]
    pub data: Vec<MetricData>,
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        MetricKind::from_name(&self.name)
    }
}

/// A single sample. Which fields are present depends on the metric type;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricData {
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub qty: Option<f64>,
    pub source: Option<String>,

    // sleep_analysis
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub value: Option<String>,

    // heart_rate
    #[serde(rename = "Avg", default, deserialize_with = "lenient_f64")]
    pub avg: Option<f64>,
    #[serde(rename = "Min", default, deserialize_with = "lenient_f64")]
    pub min: Option<f64>,
    #[serde(rename = "Max", default, deserialize_with = "lenient_f64")]
    pub max: Option<f64>,
    pub context: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Numeric fields also accept numeric strings (`"72.5"`), which some
/// exporters send
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {:?}", text))),
    }
}

/// Metric type names the loader knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    WeightBodyMass,
    BodyMassIndex,
    BodyFatPercentage,
    LeanBodyMass,
    SleepAnalysis,
    Vo2Max,
    HeartRate,
    RestingHeartRate,
    RespiratoryRate,
    HeartRateVariability,
    /// Anything else; skipped so newer exporters don't break ingestion
    Unrecognized,
}

impl MetricKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "weight_body_mass" => MetricKind::WeightBodyMass,
            "body_mass_index" => MetricKind::BodyMassIndex,
            "body_fat_percentage" => MetricKind::BodyFatPercentage,
            "lean_body_mass" => MetricKind::LeanBodyMass,
            "sleep_analysis" => MetricKind::SleepAnalysis,
            "vo2_max" => MetricKind::Vo2Max,
            "heart_rate" => MetricKind::HeartRate,
            "resting_heart_rate" => MetricKind::RestingHeartRate,
            "respiratory_rate" => MetricKind::RespiratoryRate,
            "heart_rate_variability" => MetricKind::HeartRateVariability,
            _ => MetricKind::Unrecognized,
        }
    }

    /// Whether samples of this kind feed the body composition merge
    pub fn is_body_composition(&self) -> bool {
        matches!(
            self,
            MetricKind::WeightBodyMass
                | MetricKind::BodyMassIndex
                | MetricKind::BodyFatPercentage
                | MetricKind::LeanBodyMass
        )
    }
}
