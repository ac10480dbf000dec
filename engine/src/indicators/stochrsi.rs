// Stochastic RSI indicator implementation
use super::rsi::rsi;
use super::stoch::stochastic_of_series;
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::{Candle, IndicatorId, IndicatorSeries};

const D_PERIOD: usize = 3;

pub struct StochRsi {
    name: String,
    period: usize,
}

impl StochRsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("STOCHRSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for StochRsi {
    fn id(&self) -> IndicatorId {
        IndicatorId::StochRsi
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    // RSI first, then the stochastic normalization over the RSI series with kPeriod = period.
    fn calculate(&self, data: &[Candle]) -> IndicatorSeries {
        let rsi_values = rsi(&closes(data), self.period);
        stochastic_of_series(&rsi_values, self.period, D_PERIOD).into_series()
    }
}
