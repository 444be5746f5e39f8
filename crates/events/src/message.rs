//! Subject and HTML body rendering for alert emails.

use chrono::Local;

use condwatch_core::types::{DATETIME_FORMAT, DATE_FORMAT, TIME_FORMAT};
use condwatch_core::{Threshold, Timestamp, Variable};

/// Everything the email template needs about one triggered alert.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub equipment_id: String,
    pub variable: Variable,
    pub value: f64,
    pub reason: String,
    pub threshold: Threshold,
    /// When the offending reading was taken.
    pub measured_at: Timestamp,
}

impl AlertMessage {
    /// Email subject line.
    pub fn subject(&self) -> String {
        format!(
            "CONDWATCH ALERT - {} - {}",
            self.equipment_id,
            self.variable.column()
        )
    }

    /// HTML email body: alert headline, reading details, configured limits,
    /// and an "automated message" footer.
    pub fn html_body(&self) -> String {
        format!(
            r#"<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; }}
      .container {{ max-width: 600px; margin: 0 auto; }}
      .header {{ background-color: #d32f2f; color: white; padding: 20px; border-radius: 5px; }}
      .content {{ padding: 20px; background-color: #f5f5f5; }}
      .alert-box {{ background-color: #ffebee; border-left: 4px solid #d32f2f; padding: 15px; margin: 10px 0; }}
      .info-box {{ background-color: #e3f2fd; border-left: 4px solid #1976d2; padding: 15px; margin: 10px 0; }}
      .footer {{ text-align: center; color: #666; font-size: 12px; margin-top: 20px; }}
      table {{ width: 100%; border-collapse: collapse; }}
      td {{ padding: 10px; border-bottom: 1px solid #ddd; }}
      .label {{ font-weight: bold; width: 30%; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>SAFETY ALERT</h1>
        <p>A reading outside the safe limits was detected</p>
      </div>
      <div class="content">
        <div class="alert-box">
          <h2>{variable}</h2>
          <p><strong>Value:</strong> {value:.2} {unit}</p>
          <p><strong>Status:</strong> {reason}</p>
        </div>
        <div class="info-box">
          <table>
            <tr><td class="label">Equipment:</td><td>{equipment}</td></tr>
            <tr><td class="label">Date:</td><td>{date}</td></tr>
            <tr><td class="label">Time:</td><td>{time}</td></tr>
            <tr><td class="label">Maximum limit:</td><td>{max}</td></tr>
            <tr><td class="label">Minimum limit:</td><td>{min}</td></tr>
            <tr><td class="label">Sent at:</td><td>{sent_at}</td></tr>
          </table>
        </div>
        <p style="margin-top: 20px; color: #d32f2f;">
          <strong>Recommended action:</strong> inspect the equipment immediately.
        </p>
      </div>
      <div class="footer">
        <p>This is an automated message from the condwatch monitor</p>
        <p>Do not reply to this email</p>
      </div>
    </div>
  </body>
</html>"#,
            variable = self.variable.column(),
            value = self.value,
            unit = self.variable.unit(),
            reason = self.reason,
            equipment = self.equipment_id,
            date = self.measured_at.format(DATE_FORMAT),
            time = self.measured_at.format(TIME_FORMAT),
            max = self.threshold.max,
            min = self.threshold.min,
            sent_at = Local::now().format(DATETIME_FORMAT),
        )
    }
}
