use crate::common::PanelError;
use qrcode::render::unicode;
use qrcode::QrCode;

/// Render `ticket` as a terminal QR code for a phone to scan.
pub fn generate_qr(ticket: &str) -> Result<String, PanelError> {
    let code = QrCode::new(ticket.as_bytes()).map_err(|e| PanelError::Qr(e.to_string()))?;

    let image = code
        .render::<unicode::Dense1x2>()
        // colors are inverted for better visability in terminal
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build();

    Ok(image)
}
