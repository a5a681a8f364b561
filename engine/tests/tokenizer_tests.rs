use engine::tokenizer::{tokenize, tokenize_query, Stopwords};

fn stopwords(words: &[&str]) -> Stopwords {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn it_lowercases_document_text() {
    let terms = tokenize("Tenis PROFESIONAL", &Stopwords::none());
    assert_eq!(terms, vec!["tenis", "profesional"]);
}

#[test]
fn it_filters_stopwords() {
    let sw = stopwords(&["los", "una"]);
    let terms = tokenize("los campeones ganaron una copa", &sw);
    assert_eq!(terms, vec!["campeones", "ganaron", "copa"]);
}

#[test]
fn short_alphabetic_tokens_are_dropped() {
    let terms = tokenize("a ab abc", &Stopwords::none());
    assert_eq!(terms, vec!["abc"]);
}

#[test]
fn short_numeric_tokens_are_kept() {
    let terms = tokenize("7 42 copa", &Stopwords::none());
    assert_eq!(terms, vec!["7", "42", "copa"]);
}

#[test]
fn overlong_tokens_are_dropped() {
    let long = "x".repeat(31);
    let ok = "y".repeat(30);
    let terms = tokenize(&format!("{long} {ok}"), &Stopwords::none());
    assert_eq!(terms, vec![ok]);
}

#[test]
fn urls_are_removed_entirely() {
    let terms = tokenize(
        "noticias en http://ejemplo.com/deportes/tenis hoy mismo",
        &Stopwords::none(),
    );
    assert_eq!(terms, vec!["noticias", "hoy", "mismo"]);
}

#[test]
fn character_references_decode_to_accents() {
    let terms = tokenize("campe&#243n maraton&#233s", &Stopwords::none());
    assert_eq!(terms, vec!["campeón", "maratonés"]);
}

#[test]
fn space_codes_collapse_to_separators() {
    let terms = tokenize("primero&nbsp;segundo&#160;tercero", &Stopwords::none());
    assert_eq!(terms, vec!["primero", "segundo", "tercero"]);
}

#[test]
fn line_breaks_separate_tokens() {
    let terms = tokenize("uno\r\ndos\rtres", &Stopwords::none());
    assert_eq!(terms, vec!["uno", "dos", "tres"]);
}

#[test]
fn punctuation_becomes_separators() {
    let terms = tokenize("copa, final: (resultado)", &Stopwords::none());
    assert_eq!(terms, vec!["copa", "final", "resultado"]);
}

#[test]
fn repeats_are_preserved_for_frequency_counting() {
    let terms = tokenize("gol gol gol", &Stopwords::none());
    assert_eq!(terms.len(), 3);
}

#[test]
fn query_side_shares_the_term_filter() {
    let sw = stopwords(&["de"]);
    let doc = tokenize("final de copa 42 ab", &sw);
    let query = tokenize_query("final de copa 42 ab", &sw);
    assert_eq!(doc, query);
}

#[test]
fn query_side_does_not_case_fold() {
    // uppercase letters fall outside the admitted classes and are stripped
    let terms = tokenize_query("Copa copa", &Stopwords::none());
    assert_eq!(terms, vec!["opa", "copa"]);
}
