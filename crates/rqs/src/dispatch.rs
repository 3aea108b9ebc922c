//! Dispatch - Route one invocation to a built-in verb or an alias lookup

use rqs_core::{Probe, Runner};
use std::io::{BufRead, Write};

use crate::entry::{Entry, EntryType};
use crate::error::{Result, RqsError};
use crate::output;
use crate::store::Store;

/// Built-in verbs. Anything else is an alias pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Add,
    List,
    Delete,
    DeleteAll,
}

impl Verb {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Verb::Add),
            "list" | "ls" => Some(Verb::List),
            "delete" | "del" => Some(Verb::Delete),
            "delete_all" => Some(Verb::DeleteAll),
            _ => None,
        }
    }
}

/// How an invocation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completed, including recoverable cases like "not found"
    Done,
    /// A command entry ran and exited with this code
    Exited(i32),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Done => 0,
            Outcome::Exited(code) => *code,
        }
    }
}

/// Everything one invocation needs, built once by the caller
pub struct Dispatcher<'a> {
    store: &'a mut dyn Store,
    probe: &'a dyn Probe,
    runner: &'a dyn Runner,
    out: &'a mut dyn Write,
    input: &'a mut dyn BufRead,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        store: &'a mut dyn Store,
        probe: &'a dyn Probe,
        runner: &'a dyn Runner,
        out: &'a mut dyn Write,
        input: &'a mut dyn BufRead,
    ) -> Self {
        Self {
            store,
            probe,
            runner,
            out,
            input,
        }
    }

    /// Run `command` with `args`
    pub fn dispatch(&mut self, command: &str, args: &[String]) -> Result<Outcome> {
        match Verb::parse(command) {
            Some(verb) => {
                tracing::debug!(?verb, args = args.len(), "built-in command");
                self.run_verb(verb, args)
            }
            None => self.lookup(command, args),
        }
    }

    fn run_verb(&mut self, verb: Verb, args: &[String]) -> Result<Outcome> {
        match verb {
            Verb::Add => {
                if args.len() < 2 {
                    return Err(RqsError::Usage(
                        "usage: rqs add <alias> <content...>".to_string(),
                    ));
                }
                self.add(&args[0], &args[1..])?;
            }
            Verb::List => self.list()?,
            Verb::Delete => {
                if args.len() != 1 {
                    return Err(RqsError::Usage("usage: rqs delete <alias>".to_string()));
                }
                self.delete(&args[0])?;
            }
            Verb::DeleteAll => {
                let skip_prompt = match args {
                    [] => false,
                    [flag] if flag == "-y" || flag == "--yes" => true,
                    _ => {
                        return Err(RqsError::Usage(
                            "usage: rqs delete_all [-y|--yes]".to_string(),
                        ))
                    }
                };
                self.delete_all(skip_prompt)?;
            }
        }
        Ok(Outcome::Done)
    }

    /// Store a new entry, replacing any entry with the same alias
    pub fn add(&mut self, alias: &str, tokens: &[String]) -> Result<Entry> {
        let entry = Entry::new(alias, tokens, self.probe)?;
        self.store.put(&entry.alias, &entry.encode()?)?;
        output::print_added(self.out, entry.kind)?;
        Ok(entry)
    }

    /// Print every stored entry
    pub fn list(&mut self) -> Result<()> {
        let keys = self.store.keys()?;
        self.print_entries(&keys)
    }

    /// Delete one entry; a missing alias is reported, not an error
    pub fn delete(&mut self, alias: &str) -> Result<()> {
        match self.store.delete(alias) {
            Ok(()) => output::print_deleted(self.out, alias)?,
            Err(RqsError::NotFound(_)) | Err(RqsError::InvalidAlias(_)) => {
                output::print_no_entry(self.out, alias)?
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Delete every entry after confirmation. Returns whether anything ran.
    pub fn delete_all(&mut self, skip_prompt: bool) -> Result<bool> {
        if !skip_prompt && !self.confirm("Are you sure? y/n")? {
            tracing::debug!("delete_all aborted");
            return Ok(false);
        }

        for key in self.store.keys()? {
            self.store.delete(&key)?;
        }
        output::print_deleted_all(self.out)?;
        Ok(true)
    }

    /// Resolve `pattern` against stored aliases and act on the result
    pub fn lookup(&mut self, pattern: &str, args: &[String]) -> Result<Outcome> {
        let matches = self.matching_keys(pattern)?;
        tracing::debug!(pattern, matches = matches.len(), "alias lookup");

        match matches.as_slice() {
            [] => {
                output::print_no_entry(self.out, pattern)?;
                Ok(Outcome::Done)
            }
            [key] => {
                let entry = self.load(key)?;
                match entry.kind {
                    EntryType::Command => {
                        self.out.flush()?;
                        let code = entry.execute(args, self.runner)?;
                        Ok(Outcome::Exited(code))
                    }
                    EntryType::Text => {
                        writeln!(self.out, "{}", entry.content)?;
                        Ok(Outcome::Done)
                    }
                }
            }
            // Ambiguous: show the candidates, run nothing
            _ => {
                self.print_entries(&matches)?;
                Ok(Outcome::Done)
            }
        }
    }

    /// Stored aliases matching a glob pattern (`*`, `?`, `[seq]`)
    pub fn matching_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let keys = self.store.keys()?;
        let matches = match glob::Pattern::new(&collapse_stars(pattern)) {
            Ok(glob) => keys.into_iter().filter(|k| glob.matches(k)).collect(),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "not a glob, matching literally");
                keys.into_iter().filter(|k| k == pattern).collect()
            }
        };
        Ok(matches)
    }

    fn load(&self, key: &str) -> Result<Entry> {
        let bytes = self
            .store
            .get(key)?
            .ok_or_else(|| RqsError::NotFound(key.to_string()))?;
        Entry::decode(key, &bytes)
    }

    fn print_entries(&mut self, keys: &[String]) -> Result<()> {
        let mut entries = keys
            .iter()
            .map(|key| self.load(key))
            .collect::<Result<Vec<_>>>()?;
        output::print_entries(self.out, &mut entries)?;
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        writeln!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }

        let answer = answer.trim().to_lowercase();
        Ok(matches!(answer.as_str(), "" | "y" | "yes"))
    }
}

/// Squash runs of `*` into one. Aliases have no path separators, so `**`
/// means the same as `*`, but `glob` only accepts it as a whole component.
fn collapse_stars(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::io;

    fn probe(program: &str) -> bool {
        matches!(program, "ls" | "echo" | "mongo" | "git")
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl Runner for Recorder {
        fn run(&self, command_line: &str) -> io::Result<i32> {
            self.calls.borrow_mut().push(command_line.to_string());
            Ok(0)
        }
    }

    struct Fixture {
        store: MemoryStore,
        runner: Recorder,
    }

    impl Fixture {
        fn new() -> Self {
            colored::control::set_override(false);
            Self {
                store: MemoryStore::new(),
                runner: Recorder::default(),
            }
        }

        fn run_with_input(&mut self, tokens: &[&str], input: &str) -> (Result<Outcome>, String) {
            let (command, args) = tokens.split_first().expect("command token");
            let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();

            let mut out = Vec::new();
            let mut input = io::Cursor::new(input.as_bytes().to_vec());
            let stub = probe;
            let result = {
                let mut dispatcher =
                    Dispatcher::new(&mut self.store, &stub, &self.runner, &mut out, &mut input);
                dispatcher.dispatch(command, &args)
            };
            (result, String::from_utf8(out).unwrap())
        }

        fn run(&mut self, tokens: &[&str]) -> (Result<Outcome>, String) {
            self.run_with_input(tokens, "")
        }

        fn entry(&self, alias: &str) -> Option<Entry> {
            self.store
                .get(alias)
                .unwrap()
                .map(|bytes| Entry::decode(alias, &bytes).unwrap())
        }
    }

    #[test]
    fn test_verb_parse() {
        assert_eq!(Verb::parse("ls"), Some(Verb::List));
        assert_eq!(Verb::parse("del"), Some(Verb::Delete));
        assert_eq!(Verb::parse("delete_all"), Some(Verb::DeleteAll));
        assert_eq!(Verb::parse("mongo_local"), None);
    }

    #[test]
    fn test_add_then_lookup_text() {
        let mut fx = Fixture::new();

        let (result, out) = fx.run(&["add", "APIKEY", "xxxxxx"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "🔑 rqs added a text entry.\n");

        let (result, out) = fx.run(&["APIKEY"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "xxxxxx\n");
        assert!(fx.runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_add_then_lookup_command() {
        let mut fx = Fixture::new();

        let (_, out) = fx.run(&["add", "mongo_local", "mongo", "localhost", "-u", "xxx"]);
        assert_eq!(out, "🔮 rqs added a command entry.\n");

        let entry = fx.entry("mongo_local").unwrap();
        assert_eq!(entry.content, "mongo localhost -u xxx");
        assert_eq!(entry.kind, EntryType::Command);

        let (result, out) = fx.run(&["mongo_local", "--quiet"]);
        assert_eq!(result.unwrap(), Outcome::Exited(0));
        assert!(out.is_empty());
        assert_eq!(
            *fx.runner.calls.borrow(),
            vec!["mongo localhost -u xxx --quiet"]
        );
    }

    #[test]
    fn test_type_inference() {
        let mut fx = Fixture::new();
        fx.run(&["add", "x", "ls", "-la"]).0.unwrap();
        fx.run(&["add", "y", "not_a_real_binary_zzz"]).0.unwrap();

        assert_eq!(fx.entry("x").unwrap().kind, EntryType::Command);
        assert_eq!(fx.entry("y").unwrap().kind, EntryType::Text);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut fx = Fixture::new();
        fx.run(&["add", "k", "git", "status"]).0.unwrap();
        let first = fx.store.clone();
        fx.run(&["add", "k", "git", "status"]).0.unwrap();

        assert_eq!(fx.store.keys().unwrap(), first.keys().unwrap());
        assert_eq!(fx.store.get("k").unwrap(), first.get("k").unwrap());
    }

    #[test]
    fn test_add_overwrites() {
        let mut fx = Fixture::new();
        fx.run(&["add", "k", "git", "status"]).0.unwrap();
        fx.run(&["add", "k", "secret"]).0.unwrap();

        let entry = fx.entry("k").unwrap();
        assert_eq!(entry.content, "secret");
        assert_eq!(entry.kind, EntryType::Text);
        assert_eq!(fx.store.len(), 1);
    }

    #[test]
    fn test_add_usage_errors() {
        let mut fx = Fixture::new();

        let (result, _) = fx.run(&["add"]);
        assert!(result.unwrap_err().is_usage());

        let (result, _) = fx.run(&["add", "only_alias"]);
        assert!(result.unwrap_err().is_usage());

        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_add_punctuated_aliases() {
        let mut fx = Fixture::new();
        fx.run(&["add", "a,b", "x"]).0.unwrap();
        fx.run(&["add", "{x}", "y"]).0.unwrap();

        assert_eq!(fx.run(&["a,b"]).1, "x\n");
        assert_eq!(fx.run(&["{x}"]).1, "y\n");
    }

    #[test]
    fn test_add_invalid_alias() {
        let mut fx = Fixture::new();
        let (result, _) = fx.run(&["add", "../x", "ls"]);
        assert!(matches!(result, Err(RqsError::InvalidAlias(_))));
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_list() {
        let mut fx = Fixture::new();

        let (result, out) = fx.run(&["list"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "Entries:\nempty\n");

        fx.run(&["add", "build", "git", "pull"]).0.unwrap();
        fx.run(&["add", "token", "abc"]).0.unwrap();

        let (_, out) = fx.run(&["ls"]);
        assert_eq!(out, "Entries:\n\ttoken = abc\n\tbuild -> git pull\n");
    }

    #[test]
    fn test_wildcard_resolution() {
        let mut fx = Fixture::new();
        fx.run(&["add", "foo1", "echo", "one"]).0.unwrap();
        fx.run(&["add", "foo2", "echo", "two"]).0.unwrap();
        fx.run(&["add", "bar", "echo", "bar"]).0.unwrap();

        let (result, out) = fx.run(&["foo*"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert!(out.contains("foo1 -> echo one"));
        assert!(out.contains("foo2 -> echo two"));
        assert!(!out.contains("bar"));
        assert!(fx.runner.calls.borrow().is_empty());

        let (result, _) = fx.run(&["bar"]);
        assert_eq!(result.unwrap(), Outcome::Exited(0));
        assert_eq!(*fx.runner.calls.borrow(), vec!["echo bar"]);

        let (result, out) = fx.run(&["baz*"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "rqs has no entry for baz*\n");

        let (result, out) = fx.run(&["foo**"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert!(out.contains("foo1 -> echo one"));
        assert!(out.contains("foo2 -> echo two"));
        assert!(!out.contains("bar"));

        let (result, _) = fx.run(&["f**1"]);
        assert_eq!(result.unwrap(), Outcome::Exited(0));
        assert_eq!(*fx.runner.calls.borrow(), vec!["echo bar", "echo one"]);
    }

    #[test]
    fn test_collapse_stars() {
        assert_eq!(collapse_stars("foo**"), "foo*");
        assert_eq!(collapse_stars("***"), "*");
        assert_eq!(collapse_stars("a*b**c?"), "a*b*c?");
        assert_eq!(collapse_stars("plain"), "plain");
    }

    #[test]
    fn test_wildcard_single_char_and_sets() {
        let mut fx = Fixture::new();
        fx.run(&["add", "key1", "a"]).0.unwrap();
        fx.run(&["add", "key2", "b"]).0.unwrap();

        let (_, out) = fx.run(&["key?"]);
        assert!(out.starts_with("Entries:"));

        let (_, out) = fx.run(&["key[2]"]);
        assert_eq!(out, "b\n");

        let (_, out) = fx.run(&["key[!2]"]);
        assert_eq!(out, "a\n");
    }

    #[test]
    fn test_invalid_glob_matches_literally() {
        let mut fx = Fixture::new();
        fx.run(&["add", "k", "v"]).0.unwrap();

        let (result, out) = fx.run(&["[k"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "rqs has no entry for [k\n");
    }

    #[test]
    fn test_delete() {
        let mut fx = Fixture::new();
        fx.run(&["add", "gone", "v"]).0.unwrap();

        let (result, out) = fx.run(&["delete", "gone"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "🌚 rqs deleted gone.\n");

        let (result, out) = fx.run(&["gone"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "rqs has no entry for gone\n");
    }

    #[test]
    fn test_delete_missing_is_friendly() {
        let mut fx = Fixture::new();
        let (result, out) = fx.run(&["del", "nope"]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "rqs has no entry for nope\n");
    }

    #[test]
    fn test_delete_usage() {
        let mut fx = Fixture::new();
        assert!(fx.run(&["delete"]).0.unwrap_err().is_usage());
        assert!(fx.run(&["delete", "a", "b"]).0.unwrap_err().is_usage());
    }

    #[test]
    fn test_delete_all_confirmed() {
        let mut fx = Fixture::new();
        fx.run(&["add", "a", "1"]).0.unwrap();
        fx.run(&["add", "b", "2"]).0.unwrap();

        let (result, out) = fx.run_with_input(&["delete_all"], "\n");
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "Are you sure? y/n\n🌚 rqs deleted all entries.\n");
        assert!(fx.store.keys().unwrap().is_empty());

        let (_, out) = fx.run(&["list"]);
        assert_eq!(out, "Entries:\nempty\n");
    }

    #[test]
    fn test_delete_all_answers() {
        for (answer, deleted) in [("y\n", true), ("YES\n", true), ("n\n", false), ("", false)] {
            let mut fx = Fixture::new();
            fx.run(&["add", "a", "1"]).0.unwrap();

            fx.run_with_input(&["delete_all"], answer).0.unwrap();
            assert_eq!(fx.store.is_empty(), deleted, "answer {answer:?}");
        }
    }

    #[test]
    fn test_delete_all_skip_prompt() {
        let mut fx = Fixture::new();
        fx.run(&["add", "a", "1"]).0.unwrap();

        let (_, out) = fx.run(&["delete_all", "--yes"]);
        assert_eq!(out, "🌚 rqs deleted all entries.\n");
        assert!(fx.store.is_empty());

        assert!(fx.run(&["delete_all", "now"]).0.unwrap_err().is_usage());
    }

    #[test]
    fn test_corrupt_entry_is_error() {
        let mut fx = Fixture::new();
        fx.store.put("bad", b"not json").unwrap();

        let (result, _) = fx.run(&["bad"]);
        assert!(matches!(result, Err(RqsError::Codec { .. })));
    }
}
