use plnexus_core::MarketQuote;

/// Presentation collaborator for one run.
pub trait QuotePresenter: Send + Sync {
    fn render(&self, quote: &MarketQuote);
    fn render_error(&self, message: &str);
}

/// Writes quotes to stdout and failures to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter;

impl QuotePresenter for TerminalPresenter {
    fn render(&self, quote: &MarketQuote) {
        println!("{}", format_quote(quote));
    }

    fn render_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

pub fn format_quote(quote: &MarketQuote) -> String {
    let captured = quote
        .captured_at()
        .unwrap_or_else(|| quote.timestamp().to_string());
    let stale = if quote.is_stale() { " (stale)" } else { "" };

    format!(
        "Symbol : {}\nPrice  : {:.2}\nSource : {}\nAs of  : {captured}{stale}",
        quote.symbol(),
        quote.price(),
        quote.source(),
    )
}
