use log::debug;

use crate::error::ParseError;
use crate::types::*;

type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
	Word(&'a str),
	Redirect(RedirectType),
	Pipe,
}

fn is_meta(c: char) -> bool {
	matches!(c, '<' | '>' | '|')
}

/// Splits the line on whitespace, then splits every piece again at each
/// meta-character, so `cat<in|wc` and `cat < in | wc` lex the same.
fn tokenize(line: &str) -> Vec<Token<'_>> {
	let mut tokens = vec![];
	for piece in line.split_whitespace() {
		let mut rest = piece;
		while let Some(pos) = rest.find(is_meta) {
			if pos > 0 {
				tokens.push(Token::Word(&rest[.. pos]));
			}
			tokens.push(match rest.as_bytes()[pos] {
				b'<' => Token::Redirect(RedirectType::Input),
				b'>' => Token::Redirect(RedirectType::Output),
				_ => Token::Pipe,
			});
			rest = &rest[pos + 1 ..];
		}
		if !rest.is_empty() {
			tokens.push(Token::Word(rest));
		}
	}
	tokens
}

struct Parser<'a> {
	tokens: Vec<Token<'a>>,
	i: usize,
	commands: Vec<Command>,
}

impl<'a> Parser<'a> {
	fn next(&mut self) -> Option<Token<'a>> {
		let t = self.tokens.get(self.i).copied();
		if t.is_some() {
			self.i += 1;
		}
		t
	}

	fn peek(&self) -> Option<Token<'a>> {
		self.tokens.get(self.i).copied()
	}

	fn current(&mut self) -> &mut Command {
		let last = self.commands.len() - 1;
		&mut self.commands[last]
	}

	fn push_argument(&mut self, word: &str) -> ParseResult<()> {
		let current = self.current();
		if current.arguments.len() >= ARG_MAX {
			return Err(ParseError::TooManyArguments);
		}
		current.arguments.push(word.to_owned());
		Ok(())
	}

	fn require_command(&mut self) -> ParseResult<()> {
		if self.current().arguments.is_empty() {
			Err(ParseError::MissingCommand)
		} else {
			Ok(())
		}
	}

	fn parse_redirect(&mut self, typ: RedirectType) -> ParseResult<()> {
		self.require_command()?;
		match self.next() {
			Some(Token::Word(target)) => {
				self.current().set_redirect(typ, target);
				Ok(())
			},
			_ => Err(match typ {
				RedirectType::Input => ParseError::NoInputFile,
				RedirectType::Output => ParseError::NoOutputFile,
			}),
		}
	}

	fn parse_pipe(&mut self) -> ParseResult<()> {
		self.require_command()?;
		match self.peek() {
			Some(Token::Word(_)) => {
				self.commands.push(Command::default());
				Ok(())
			},
			_ => Err(ParseError::MissingCommand),
		}
	}

	fn parse_pipeline(mut self) -> ParseResult<Pipeline> {
		while let Some(token) = self.next() {
			match token {
				Token::Word(word) => self.push_argument(word)?,
				Token::Redirect(typ) => self.parse_redirect(typ)?,
				Token::Pipe => self.parse_pipe()?,
			}
		}
		self.require_command()?;
		Ok(Pipeline { commands: self.commands })
	}
}

pub fn parse(line: &str) -> ParseResult<Pipeline> {
	let parser = Parser { tokens: tokenize(line), i: 0, commands: vec![Command::default()] };
	let pipeline = parser.parse_pipeline()?;
	debug!("parsed {:?}", pipeline);
	Ok(pipeline)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(command: &Command) -> Vec<&str> {
		command.arguments.iter().map(|s| s.as_str()).collect()
	}

	#[test]
	fn simple_command() {
		let p = parse("ls -l  -a\t/tmp").unwrap();
		assert_eq!(p.commands.len(), 1);
		assert_eq!(args(&p.commands[0]), ["ls", "-l", "-a", "/tmp"]);
		assert_eq!(p.commands[0].input, None);
		assert_eq!(p.commands[0].output, None);
	}

	#[test]
	fn input_redirect_spellings_agree() {
		let expected = parse("cat < in.txt").unwrap();
		assert_eq!(args(expected.first()), ["cat"]);
		assert_eq!(expected.first().input.as_deref(), Some("in.txt"));
		for line in &["cat<in.txt", "cat <in.txt", "cat< in.txt"] {
			assert_eq!(parse(line).unwrap(), expected, "{}", line);
		}
	}

	#[test]
	fn output_redirect_keeps_trailing_argument() {
		let p = parse("echo hello>out.txt").unwrap();
		assert_eq!(args(p.first()), ["echo", "hello"]);
		assert_eq!(p.first().output.as_deref(), Some("out.txt"));
	}

	#[test]
	fn three_stage_pipeline() {
		let p = parse("cat f | grep -v x |wc -l").unwrap();
		let stages: Vec<Vec<&str>> = p.commands.iter().map(args).collect();
		assert_eq!(stages, vec![vec!["cat", "f"], vec!["grep", "-v", "x"], vec!["wc", "-l"]]);
	}

	#[test]
	fn glued_pipe() {
		let p = parse("echo a|tr a b").unwrap();
		assert_eq!(p.commands.len(), 2);
		assert_eq!(args(&p.commands[0]), ["echo", "a"]);
		assert_eq!(args(&p.commands[1]), ["tr", "a", "b"]);
	}

	#[test]
	fn glued_redirect_then_pipe() {
		let p = parse("cat<in.txt|wc").unwrap();
		assert_eq!(p.first().input.as_deref(), Some("in.txt"));
		assert_eq!(args(p.last()), ["wc"]);
	}

	#[test]
	fn interior_redirections_are_kept_for_validation() {
		let p = parse("a > out | b < in | c").unwrap();
		assert_eq!(p.commands[0].output.as_deref(), Some("out"));
		assert_eq!(p.commands[1].input.as_deref(), Some("in"));
	}

	#[test]
	fn missing_command() {
		for line in &["", "   ", "| wc", "< in cat", ">out", "ls |", "ls | | wc", "ls |< in", "ls|"] {
			assert_eq!(parse(line), Err(ParseError::MissingCommand), "{:?}", line);
		}
	}

	#[test]
	fn parsed_pipelines_are_never_empty() {
		for line in &["ls", "a|b", "cat<in", "x > y | z"] {
			let p = parse(line).unwrap();
			assert!(!p.commands().is_empty(), "{:?}", line);
			assert!(!p.first().arguments.is_empty() && !p.last().arguments.is_empty());
		}
	}

	#[test]
	fn missing_redirect_target() {
		assert_eq!(parse("cat <"), Err(ParseError::NoInputFile));
		assert_eq!(parse("cat <| wc"), Err(ParseError::NoInputFile));
		assert_eq!(parse("cat < > f"), Err(ParseError::NoInputFile));
		assert_eq!(parse("echo >"), Err(ParseError::NoOutputFile));
		assert_eq!(parse("echo>|wc"), Err(ParseError::NoOutputFile));
		assert_eq!(parse("echo >> f"), Err(ParseError::NoOutputFile));
	}

	#[test]
	fn argument_limit() {
		let sixteen: Vec<String> = (0 .. ARG_MAX).map(|i| format!("a{}", i)).collect();
		assert!(parse(&sixteen.join(" ")).is_ok());

		let seventeen = format!("{} a16", sixteen.join(" "));
		assert_eq!(parse(&seventeen), Err(ParseError::TooManyArguments));
	}

	#[test]
	fn argument_limit_is_per_command() {
		let sixteen: Vec<String> = (0 .. ARG_MAX).map(|i| format!("a{}", i)).collect();
		let line = format!("{} | {}", sixteen.join(" "), sixteen.join(" "));
		assert_eq!(parse(&line).unwrap().commands.len(), 2);
	}

	#[test]
	fn glued_prefix_counts_toward_limit() {
		let sixteen: Vec<String> = (0 .. ARG_MAX).map(|i| format!("a{}", i)).collect();
		let line = format!("{}<in", sixteen.join(" "));
		assert!(parse(&line).is_ok());
		let line = format!("{} extra<in", sixteen.join(" "));
		assert_eq!(parse(&line), Err(ParseError::TooManyArguments));
	}

	#[test]
	fn last_redirect_wins() {
		let p = parse("cat < a < b").unwrap();
		assert_eq!(p.first().input.as_deref(), Some("b"));
	}
}
