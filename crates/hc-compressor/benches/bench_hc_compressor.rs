use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hc_compressor::{CompressorConfig, HtmlCompressor, SurroundingSpaces};

fn generate_page(size_kb: usize) -> String {
    let section = r#"
    <div class="card"  id="item">
        <!-- card body -->
        <h2>  Product   title </h2>
        <p>The quick brown fox jumps over the lazy dog.   Repeated   spacing here.</p>
        <a href="http://example.com/item" onclick="javascript: track( 'click' );">more</a>
        <input type="text" name="q" disabled="disabled">
        <pre>  keep   this
           as is </pre>
        <script type="text/javascript">
            // counter
            var total = 0;
            for (var i = 0; i < 10; i++) { total += i; }
        </script>
        <style type="text/css">
            .card { margin: 0px; color: #ff0000; }
        </style>
    </div>
"#;
    let mut page = String::with_capacity(size_kb * 1024 + 128);
    page.push_str("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\">\n<html><body>");
    while page.len() < size_kb * 1024 {
        page.push_str(section);
    }
    page.push_str("</body></html>");
    page
}

fn full_config() -> CompressorConfig {
    CompressorConfig {
        remove_comments: true,
        remove_intertag_spaces: true,
        remove_quotes: true,
        compress_javascript: true,
        compress_css: true,
        simple_doctype: true,
        remove_script_attributes: true,
        remove_style_attributes: true,
        remove_input_attributes: true,
        remove_javascript_protocol: true,
        remove_http_protocol: true,
        simple_boolean_attributes: true,
        remove_surrounding_spaces: Some(SurroundingSpaces::Max),
        ..CompressorConfig::default()
    }
}

fn bench_compress_page(c: &mut Criterion) {
    let page_1k = generate_page(1);
    let page_10k = generate_page(10);
    let page_100k = generate_page(100);

    for (name, config) in [("default", CompressorConfig::default()), ("full", full_config())] {
        let Ok(compressor) = HtmlCompressor::new(config) else { continue };
        c.bench_function(&format!("compress_{name}_1kb"), |b| {
            b.iter(|| black_box(compressor.compress(black_box(&page_1k))))
        });
        c.bench_function(&format!("compress_{name}_10kb"), |b| {
            b.iter(|| black_box(compressor.compress(black_box(&page_10k))))
        });
        c.bench_function(&format!("compress_{name}_100kb"), |b| {
            b.iter(|| black_box(compressor.compress(black_box(&page_100k))))
        });
    }
}

fn bench_preserve_heavy(c: &mut Criterion) {
    let mut page = String::new();
    for i in 0..500 {
        page.push_str(&format!("<p>  row {i}  <?php echo $row[{i}]; ?>  </p>\n"));
    }
    let config = CompressorConfig::default().with_preserve_pattern(hc_compressor::PHP_TAG_PATTERN.clone());
    let Ok(compressor) = HtmlCompressor::new(config) else { return };
    c.bench_function("compress_php_500_fragments", |b| {
        b.iter(|| black_box(compressor.compress(black_box(&page))))
    });
}

criterion_group!(benches, bench_compress_page, bench_preserve_heavy);
criterion_main!(benches);
