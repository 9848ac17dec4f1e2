use std::io::Write;

use anyhow::{Context, Result};

use crate::csv::encode_trips;
use crate::datetime;
use crate::trip::TripRecord;

/// 運行記録の画面表示を行うためのtrait。
#[cfg_attr(test, mockall::automock)]
pub trait TripView {
    /// 運行記録の一覧画面を表示する。
    ///
    /// # Arguments
    ///
    /// * `trips` - 表示する運行記録
    fn show_trips(&mut self, trips: &[TripRecord]) -> Result<()>;

    /// 運行記録のCSV画面を表示する。
    fn show_csv(&mut self, trips: &[TripRecord]) -> Result<()>;
}

/// 運行記録をConsoleに表示する。
///
/// 一覧はMarkdownのlist形式で、CSVはコピーできるようにそのまま出力する。
pub struct ConsoleTripView<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleTripView<'a, W> {
    /// 新しい`ConsoleTripView`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> TripView for ConsoleTripView<'a, W> {
    // 一覧は開始時刻の昇順で表示する。storeの並び順は変更しない。
    fn show_trips(&mut self, trips: &[TripRecord]) -> Result<()> {
        let mut sorted_trips = trips.to_vec();
        sorted_trips.sort_by_key(|trip| trip.started_at);

        for trip in sorted_trips {
            writeln!(
                self.writer,
                "- {} ~ {}: {} ({}) {} -> {}",
                datetime::format_local(Some(trip.started_at)),
                datetime::format_local(Some(trip.ended_at)),
                trip.driver,
                trip.truck,
                trip.pickup,
                trip.delivery
            )
            .with_context(|| format!("Failed to write trip: {:?}", trip))?;
        }

        Ok(())
    }

    fn show_csv(&mut self, trips: &[TripRecord]) -> Result<()> {
        writeln!(self.writer, "{}", encode_trips(trips)).context("Failed to write csv")
    }
}
