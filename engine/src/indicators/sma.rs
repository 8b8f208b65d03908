// Simple Moving Average (SMA) over closing prices
use super::MovingAverageWindow;
use shared::models::Candle;

pub struct Sma {
    window: MovingAverageWindow,
}

impl Sma {
    pub fn new(window: MovingAverageWindow) -> Self {
        Self { window }
    }

    /// One entry per candle; `None` until the window has filled.
    pub fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let period = self.window.periods();
        if data.len() < period {
            return vec![None; data.len()];
        }

        let mut results = vec![None; period - 1];

        let mut sum: f64 = data.iter().take(period).map(|c| c.close).sum();
        results.push(Some(sum / period as f64));

        // Slide the window
        for i in period..data.len() {
            sum = sum - data[i - period].close + data[i].close;
            results.push(Some(sum / period as f64));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn candles(closes: &[f64]) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                date: start + Duration::days(i as i64),
                open: close, high: close, low: close, close,
                volume: 0.0,
            })
            .collect()
    }

    fn sma(window: u32) -> Sma {
        Sma::new(MovingAverageWindow::new(window).unwrap())
    }

    fn assert_option_vec_eq(a: &[Option<f64>], b: &[Option<f64>]) {
        assert_eq!(a.len(), b.len(), "Vectors differ in length");
        for (i, (val_a, val_b)) in a.iter().zip(b.iter()).enumerate() {
            match (val_a, val_b) {
                (None, None) => {}
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9, "Mismatch at index {}: {} != {}", i, x, y),
                _ => panic!("Mismatch at index {}: {:?} != {:?}", i, val_a, val_b),
            }
        }
    }

    #[test]
    fn test_sma_calculation() {
        let results = sma(3).calculate(&candles(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        // expected: -, -, (1+2+3)/3=2.0, (2+3+4)/3=3.0, (3+4+5)/3=4.0
        assert_option_vec_eq(&results, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_matches_window_mean_everywhere() {
        let closes = [101.3, 99.8, 102.4, 103.9, 98.2, 97.5, 100.0, 104.1, 105.6, 103.3, 102.0];
        let window = 4;
        let results = sma(window).calculate(&candles(&closes));
        for (i, value) in results.iter().enumerate() {
            if i + 1 < window as usize {
                assert_eq!(*value, None);
            } else {
                let slice = &closes[i + 1 - window as usize..=i];
                let mean = slice.iter().sum::<f64>() / window as f64;
                assert!((value.unwrap() - mean).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sma_insufficient_data() {
        let results = sma(3).calculate(&candles(&[1.0, 2.0]));
        assert_eq!(results, vec![None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        let results = sma(1).calculate(&candles(&[1.0, 2.0, 3.0]));
        assert_option_vec_eq(&results, &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(sma(3).calculate(&[]).is_empty());
    }
}
