#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(html) = std::str::from_utf8(data) {
        let _ = mcp_secondhand::adapters::fetcher::listing_parser::parse_listing_detail(
            html,
            "fuzz",
            "http://www.secondhand.com.mt",
        );
    }
});
