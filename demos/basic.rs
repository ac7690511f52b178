use hebnorm::{
    in_list, leaf, Analysis, Analyzer, Args, Engine, ListRegistry, Node, Registry, RuleSetBuilder,
};
use tracing_subscriber::EnvFilter;

/// Tags a token as `before_noun` when the next token carries the definite article.
struct DefiniteArticle;

impl Analyzer for DefiniteArticle {
    fn analyze(&self, tokens: &[String]) -> Analysis {
        let mut analysis = Analysis::new(tokens.len());
        for (i, pair) in tokens.windows(2).enumerate() {
            if pair[1].starts_with('ה') {
                analysis.add_feature(i, "before_noun");
            }
        }
        analysis
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hebnorm=debug")),
        )
        .init();

    // Define rules
    let rules = RuleSetBuilder::new()
        .cost("in_list", 5.0)
        .cost("is_syntactic_feature", 50.0)
        .rule("vav_before_noun", |r| {
            r.describe("insert vav after a prefix that precedes a noun")
                .when(Node::all([
                    in_list("PREFIXES"),
                    leaf("is_syntactic_feature").arg("feature", "before_noun"),
                ]))
                .unless(in_list("NO_VAV"))
                .then("add_after", Args::new().with("letter", "ו"))
        })
        .compile()
        .expect("failed to compile rules");

    println!("{rules}");

    let mut lists = ListRegistry::new();
    lists.extend("PREFIXES", ["של", "כל", "ב"]);
    lists.extend("NO_VAV", ["כל"]);

    let registry = Registry::with_builtins();
    rules.verify(&registry).expect("unregistered function");

    let engine = Engine::new(rules, registry)
        .with_lists(lists)
        .with_analyzer(DefiniteArticle);

    // Run over a sentence
    let sentence = "בגן של החיות כל היום";
    match engine.run(sentence) {
        Ok(edits) => {
            for edit in edits {
                println!("{edit:?}");
            }
        }
        Err(err) => eprintln!("evaluation failed: {err}"),
    }
}
