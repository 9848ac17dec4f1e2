use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::catalog::{Catalog, ChoiceField};
use crate::console::TripView;
use crate::datetime;
use crate::session::{ResetPolicy, StartPolicy, TripSession};

/// `session`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct SessionArgs {
    #[clap(
        long = "options",
        help = "Sets a JSON file with the option lists",
        parse(from_os_str)
    )]
    pub options_file: Option<PathBuf>,

    #[clap(
        long = "start-check",
        default_value = "full",
        help = "Fields required before start: full or odometer",
        parse(try_from_str = parse_start_policy),
    )]
    start_policy: StartPolicy,

    #[clap(
        long = "reset",
        default_value = "full",
        help = "Fields cleared after a trip: full, keep-vehicle or keep-selections",
        parse(try_from_str = parse_reset_policy),
    )]
    reset_policy: ResetPolicy,
}

/// 対話的に運行記録を取るセッションを実行するコマンド。
///
/// 1行1コマンドの形式で入力を読み、Draftの編集と運行の開始・終了、
/// 一覧・CSV画面の表示を行う。記録はセッションの間だけメモリに保持する。
pub struct SessionCommand<'a, V: TripView, R: BufRead, W: Write> {
    catalog: &'a Catalog,
    view: &'a mut V,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, V: TripView, R: BufRead, W: Write> SessionCommand<'a, V, R, W> {
    /// 新しい`SessionCommand`を返す。
    ///
    /// # Arguments
    ///
    /// * `catalog` - 選択式フィールドの選択肢一覧
    /// * `view` - 一覧・CSV画面の表示先
    /// * `input` - コマンドの読み込み元
    /// * `output` - プロンプトとメッセージの出力先
    pub fn new(catalog: &'a Catalog, view: &'a mut V, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            catalog,
            view,
            input,
            output,
        }
    }

    /// `session`サブコマンドの処理を行う。
    ///
    /// 入力がEOFになるか`quit`が入力されるまでコマンドを処理し、
    /// 終了時のセッションを返す。
    ///
    /// # Arguments
    ///
    /// * `args` - `session`サブコマンドの引数
    pub fn run(&mut self, args: SessionArgs) -> Result<TripSession> {
        let mut session = TripSession::new(args.start_policy, args.reset_policy);
        writeln!(self.output, "Type 'help' to list the available commands.")
            .context("Failed to write the greeting")?;

        loop {
            write!(self.output, "> ").context("Failed to write the prompt")?;
            self.output.flush().context("Failed to flush the prompt")?;
            let Some(line) = self.read_line()? else {
                break;
            };

            match line.trim() {
                "" => {}
                "help" => self.show_help()?,
                "driver" => self.choose_option(&mut session, ChoiceField::Driver)?,
                "truck" => self.choose_option(&mut session, ChoiceField::Truck)?,
                "customer" => self.choose_option(&mut session, ChoiceField::Customer)?,
                "material" => self.choose_option(&mut session, ChoiceField::Material)?,
                "pickup" => self.choose_option(&mut session, ChoiceField::Pickup)?,
                "delivery" => self.prompt_delivery(&mut session)?,
                "odometer" => self.prompt_odometer(&mut session)?,
                "show" => self.show_draft(&session)?,
                "start" => match session.start_trip() {
                    Ok(started_at) => writeln!(
                        self.output,
                        "Trip started at {}.",
                        datetime::format_local(Some(started_at))
                    )?,
                    Err(err) => writeln!(self.output, "{}", err)?,
                },
                "end" => match session.end_trip() {
                    Ok(trip) => writeln!(
                        self.output,
                        "Trip saved: {} -> {}.",
                        trip.pickup, trip.delivery
                    )?,
                    Err(err) => writeln!(self.output, "{}", err)?,
                },
                "trips" => self.view.show_trips(session.records())?,
                "csv" => self.view.show_csv(session.records())?,
                "quit" | "exit" => break,
                unknown => writeln!(self.output, "Unknown command: {}", unknown)?,
            }
        }

        info!("Session finished with {} records.", session.records().len());

        Ok(session)
    }

    /// 選択式フィールドの選択肢を表示し、番号で選ばせて設定する。
    ///
    /// 番号として解釈できない入力や範囲外の番号の場合は、フィールドを変更しない。
    fn choose_option(&mut self, session: &mut TripSession, field: ChoiceField) -> Result<()> {
        let options = self.catalog.options(field);
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, option)?;
        }
        write!(self.output, "{} number: ", field.label())?;
        self.output.flush()?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };

        let selected = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| options.get(index));
        match selected {
            Some(value) => {
                let value = value.clone();
                session.draft_mut().set_choice(field, value.clone());
                writeln!(self.output, "{} set to {}.", field.label(), value)?;
            }
            None => writeln!(self.output, "Invalid selection.")?,
        }

        Ok(())
    }

    /// 配達先を入力させて設定する。
    fn prompt_delivery(&mut self, session: &mut TripSession) -> Result<()> {
        write!(self.output, "Delivery address: ")?;
        self.output.flush()?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };

        session.draft_mut().set_delivery(&line);
        if session.draft().delivery.is_empty() {
            writeln!(self.output, "Delivery cleared.")?;
        } else {
            writeln!(self.output, "Delivery set to {}.", session.draft().delivery)?;
        }

        Ok(())
    }

    /// 開始時のオドメーターを入力させて設定する。
    fn prompt_odometer(&mut self, session: &mut TripSession) -> Result<()> {
        write!(self.output, "Starting odometer: ")?;
        self.output.flush()?;
        let Some(line) = self.read_line()? else {
            return Ok(());
        };

        session.draft_mut().set_odometer(&line);
        if session.draft().odometer.is_empty() {
            writeln!(self.output, "Starting odometer cleared.")?;
        } else {
            writeln!(
                self.output,
                "Starting odometer set to {}.",
                session.draft().odometer
            )?;
        }

        Ok(())
    }

    /// 入力途中のDraftを表示する。未入力のフィールドは`-`で表示する。
    fn show_draft(&mut self, session: &TripSession) -> Result<()> {
        let draft = session.draft();
        writeln!(self.output, "Driver: {}", or_dash(&draft.driver))?;
        writeln!(self.output, "Truck: {}", or_dash(&draft.truck))?;
        writeln!(self.output, "Starting Odometer: {}", or_dash(&draft.odometer))?;
        writeln!(self.output, "Pickup: {}", or_dash(&draft.pickup))?;
        writeln!(self.output, "Delivery: {}", or_dash(&draft.delivery))?;
        writeln!(self.output, "Material: {}", or_dash(&draft.material))?;
        writeln!(self.output, "Customer: {}", or_dash(&draft.customer))?;
        writeln!(
            self.output,
            "Started: {}",
            or_dash(&datetime::format_local(draft.started_at))
        )?;

        Ok(())
    }

    /// 利用できるコマンドの一覧を表示する。
    fn show_help(&mut self) -> Result<()> {
        writeln!(self.output, "driver/truck/customer/material/pickup: choose a value")?;
        writeln!(self.output, "delivery/odometer: type a value")?;
        writeln!(self.output, "show: show the current draft")?;
        writeln!(self.output, "start/end: start or end the trip")?;
        writeln!(self.output, "trips: show the finished trips")?;
        writeln!(self.output, "csv: show the trips as CSV")?;
        writeln!(self.output, "quit: end the session")?;

        Ok(())
    }

    /// 入力から1行読み込む。EOFの場合は`None`を返す。
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// 運行開始前の入力チェックのポリシーをパースする。
fn parse_start_policy(s: &str) -> Result<StartPolicy> {
    match s {
        "full" => Ok(StartPolicy::Full),
        "odometer" => Ok(StartPolicy::OdometerOnly),
        _ => Err(anyhow!("Unknown start check policy: {}", s)),
    }
}

/// 運行確定後のフィールドクリアのポリシーをパースする。
fn parse_reset_policy(s: &str) -> Result<ResetPolicy> {
    match s {
        "full" => Ok(ResetPolicy::Full),
        "keep-vehicle" => Ok(ResetPolicy::KeepVehicle),
        "keep-selections" => Ok(ResetPolicy::KeepSelections),
        _ => Err(anyhow!("Unknown reset policy: {}", s)),
    }
}
