//! Benchmarks for lexing and rendering.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tinge::{
    AnsiRenderer, HtmlRenderer, Language, LexerRegistry, Renderer, SyntaxHighlighter, TextEdit,
    Theme,
};

/// Generates a C source file with `functions` small functions.
fn generate_c_source(functions: usize) -> String {
    let mut source = String::from("#include <stdio.h>\n#define LIMIT 0x40u\n\n");
    for i in 0..functions {
        source.push_str(&format!(
            "/* function {i} */\nstatic int step_{i}(const char *s, int n) {{\n    \
             if (s == NULL) return -1; // guard\n    \
             for (int k = 0; k < n && k < LIMIT; ++k) printf(\"%d: %c\\n\", k, s[k]);\n    \
             return n * {i} + 'a';\n}}\n\n"
        ));
    }
    source
}

/// Benchmarks a full tokenize at several document sizes.
fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let lexer = LexerRegistry::get_lexer(Language::C);

    for size in [10, 100, 1000, 10000].iter() {
        let source = generate_c_source(*size);

        group.bench_with_input(BenchmarkId::new("c", size), &source, |b, source| {
            b.iter(|| {
                let tokens = lexer.tokenize(black_box(source.as_bytes()));
                black_box(tokens)
            })
        });
    }

    group.finish();
}

/// Benchmarks a single keystroke in a large document, incremental vs full.
fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental");

    let base = generate_c_source(5000);
    let mid = base.len() / 2;
    let at = mid + base[mid..].find("return n").unwrap_or(0);

    let mut edited = base.clone();
    edited.insert(at, 'x');

    group.bench_function("single_char_edit", |b| {
        b.iter_with_setup(
            || {
                let mut highlighter = SyntaxHighlighter::for_language(Language::C);
                highlighter.update(base.as_bytes(), false);
                highlighter
            },
            |mut highlighter| {
                highlighter.edit(TextEdit::insert(at, 1));
                highlighter.update(black_box(edited.as_bytes()), false);
                black_box(highlighter)
            },
        )
    });

    group.bench_function("open_block_comment", |b| {
        let mut commented = base.clone();
        commented.insert_str(at, "/*");

        b.iter_with_setup(
            || {
                let mut highlighter = SyntaxHighlighter::for_language(Language::C);
                highlighter.update(base.as_bytes(), false);
                highlighter
            },
            |mut highlighter| {
                highlighter.edit(TextEdit::insert(at, 2));
                highlighter.update(black_box(commented.as_bytes()), false);
                black_box(highlighter)
            },
        )
    });

    group.bench_function("full_relex", |b| {
        b.iter_with_setup(
            || {
                let mut highlighter = SyntaxHighlighter::for_language(Language::C);
                highlighter.update(base.as_bytes(), false);
                highlighter
            },
            |mut highlighter| {
                highlighter.update(black_box(edited.as_bytes()), true);
                black_box(highlighter)
            },
        )
    });

    group.finish();
}

/// Benchmarks rendering a pre-tokenized document.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let source = generate_c_source(1000);
    let tokens = LexerRegistry::get_lexer(Language::C).tokenize(source.as_bytes());
    let theme = Theme::dark();

    group.bench_function("html_classes", |b| {
        let renderer = HtmlRenderer::default();
        b.iter(|| {
            let html = renderer.render(black_box(&source), &tokens, &theme).unwrap();
            black_box(html)
        })
    });

    group.bench_function("html_inline", |b| {
        let renderer = HtmlRenderer {
            inline_styles: true,
            ..Default::default()
        };
        b.iter(|| {
            let html = renderer.render(black_box(&source), &tokens, &theme).unwrap();
            black_box(html)
        })
    });

    group.bench_function("ansi_true_color", |b| {
        let renderer = AnsiRenderer::default();
        b.iter(|| {
            let ansi = renderer.render(black_box(&source), &tokens, &theme).unwrap();
            black_box(ansi)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_incremental, bench_render);
criterion_main!(benches);
