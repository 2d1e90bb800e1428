//! Shared fixtures: report documents shaped like the exchange's HTML output.

#![allow(dead_code)]

use std::sync::Arc;

use ampscan_core::{
    InstrumentRow, ReportTable, Screener, ScreenerConfig, StaticHttpClient, TradeDate,
};

/// One report row as the exchange prints it (thousands separators included).
pub struct Listing {
    pub code: &'static str,
    pub name: &'static str,
    pub volume: &'static str,
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub close: &'static str,
    pub sign: &'static str,
    pub change: &'static str,
}

impl Listing {
    pub fn new(code: &'static str, volume: &'static str) -> Self {
        Self {
            code,
            name: "測試",
            volume,
            open: "100.00",
            high: "110.00",
            low: "95.00",
            close: "105.00",
            sign: "+",
            change: "5.00",
        }
    }

    pub fn prices(
        mut self,
        open: &'static str,
        high: &'static str,
        low: &'static str,
        close: &'static str,
    ) -> Self {
        self.open = open;
        self.high = high;
        self.low = low;
        self.close = close;
        self
    }

    pub fn change(mut self, sign: &'static str, change: &'static str) -> Self {
        self.sign = sign;
        self.change = change;
        self
    }
}

const SUMMARY_TABLE: &str = r#"
<table>
  <thead>
    <tr><th colspan="4">價格指數(臺灣證券交易所)</th></tr>
    <tr><th>指數</th><th>收盤指數</th><th>漲跌(+/-)</th><th>漲跌點數</th></tr>
  </thead>
  <tbody>
    <tr><td>寶島股價指數</td><td>26,552.51</td><td><p style= color:red>+</p></td><td>123.45</td></tr>
    <tr><td>發行量加權股價指數</td><td>23,487.31</td><td><p style= color:red>+</p></td><td>112.07</td></tr>
  </tbody>
</table>"#;

const TRAILING_NOTE_TABLE: &str = r#"
<table>
  <thead><tr><th>備註</th></tr></thead>
  <tbody><tr><td>漲跌價差為當日收盤價與前一營業日收盤價比較。</td></tr></tbody>
</table>"#;

pub fn report_html(listings: &[Listing]) -> String {
    let mut body = String::from(
        "<html><head><meta charset=\"utf-8\"></head><body><div>",
    );
    body.push_str(SUMMARY_TABLE);
    body.push_str(
        r#"
<table>
  <thead>
    <tr><th colspan="16">113年10月18日每日收盤行情(全部(不含權證、牛熊證))</th></tr>
    <tr>
      <th>證券代號</th><th>證券名稱</th><th>成交股數</th><th>成交筆數</th><th>成交金額</th>
      <th>開盤價</th><th>最高價</th><th>最低價</th><th>收盤價</th><th>漲跌(+/-)</th>
      <th>漲跌價差</th><th>最後揭示買價</th><th>最後揭示買量</th><th>最後揭示賣價</th>
      <th>最後揭示賣量</th><th>本益比</th>
    </tr>
  </thead>
  <tbody>"#,
    );

    for listing in listings {
        let sign_cell = match listing.sign {
            "+" => String::from("<p style= color:red>+</p>"),
            "-" => String::from("<p style= color:green>-</p>"),
            other => format!("<p>{other}</p>"),
        };
        body.push_str(&format!(
            "\n    <tr><td>{}</td><td>{}</td><td>{}</td><td>1,024</td><td>12,345,678</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>0.00</td><td>1</td><td>0.00</td><td>1</td><td>12.50</td></tr>",
            listing.code,
            listing.name,
            listing.volume,
            listing.open,
            listing.high,
            listing.low,
            listing.close,
            sign_cell,
            listing.change,
        ));
    }

    body.push_str("\n  </tbody>\n</table>");
    body.push_str(TRAILING_NOTE_TABLE);
    body.push_str("</div></body></html>");
    body
}

pub fn trade_date() -> TradeDate {
    TradeDate::parse("2024-10-18").expect("valid fixture date")
}

pub fn find_row<'a>(table: &'a ReportTable, code: &str) -> Option<&'a InstrumentRow> {
    table.rows.iter().find(|row| row.code.as_str() == code)
}

pub fn screener_for(body: String) -> (Screener, Arc<StaticHttpClient>) {
    let client = Arc::new(StaticHttpClient::ok(body));
    let screener = Screener::with_client(client.clone(), &ScreenerConfig::default());
    (screener, client)
}
