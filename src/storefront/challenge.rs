use rand::Rng;

/// Human-verification gate in front of order and comment submission.
pub trait HumanCheck {
    /// Text shown to the user.
    fn prompt(&self) -> String;
    /// Check an answer. A wrong answer replaces the puzzle.
    fn answer(&mut self, answer: &str) -> bool;
    fn passed(&self) -> bool;
    /// Forget a previous pass and present a fresh puzzle.
    fn reset(&mut self);
}

/// "What is a + b?" with both operands in `1..=10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithmeticChallenge {
    a: u8,
    b: u8,
    passed: bool,
}

impl Default for ArithmeticChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl ArithmeticChallenge {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_operands(rng.gen_range(1..=10), rng.gen_range(1..=10))
    }

    pub fn from_operands(a: u8, b: u8) -> Self {
        Self {
            a,
            b,
            passed: false,
        }
    }

    pub fn expected(&self) -> u16 {
        u16::from(self.a) + u16::from(self.b)
    }
}

impl HumanCheck for ArithmeticChallenge {
    fn prompt(&self) -> String {
        format!("What is {} + {}?", self.a, self.b)
    }

    fn answer(&mut self, answer: &str) -> bool {
        if answer.trim().parse::<u16>().ok() == Some(self.expected()) {
            self.passed = true;
        } else {
            *self = Self::new();
        }
        self.passed
    }

    fn passed(&self) -> bool {
        self.passed
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
