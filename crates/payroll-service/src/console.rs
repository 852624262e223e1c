//! Console record entry.
//!
//! Reads one employee (id, name, salary) from whitespace-separated tokens,
//! prompting before each field. Input and output are generic so the CLI
//! passes locked stdin/stdout and tests pass in-memory buffers.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::{PayrollError, PayrollResult};
use payroll_core::validation::{validate_employee_name, validate_salary};
use payroll_core::{EmployeePayroll, ValidationError};

/// Splits buffered input into whitespace-delimited tokens, line by line.
struct Tokens<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(input: R) -> Self {
        Tokens {
            input,
            pending: VecDeque::new(),
        }
    }

    fn next(&mut self) -> PayrollResult<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(PayrollError::Console)?;
            if read == 0 {
                return Err(PayrollError::Console(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before the employee record was complete",
                )));
            }

            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

fn prompt<W: Write>(output: &mut W, text: &str) -> PayrollResult<()> {
    writeln!(output, "{}", text).map_err(PayrollError::Console)?;
    output.flush().map_err(PayrollError::Console)
}

/// Prompts for and reads a single employee record.
///
/// The name is a single token. Start date and gender are left unset.
pub fn read_employee<R: BufRead, W: Write>(
    input: R,
    mut output: W,
) -> PayrollResult<EmployeePayroll> {
    let mut tokens = Tokens::new(input);

    prompt(&mut output, "Enter Employee ID:")?;
    let raw_id = tokens.next()?;
    let id: i64 = raw_id.parse().map_err(|_| {
        ValidationError::invalid_format("id", format!("'{}' is not an integer", raw_id))
    })?;

    prompt(&mut output, "Enter Employee Name")?;
    let name = tokens.next()?;
    validate_employee_name(&name)?;

    prompt(&mut output, "Enter Employee Salary")?;
    let raw_salary = tokens.next()?;
    let salary: f64 = raw_salary.parse().map_err(|_| {
        ValidationError::invalid_format("salary", format!("'{}' is not a number", raw_salary))
    })?;
    validate_salary(salary)?;

    debug!(id, name = %name, salary, "Employee read from console");
    Ok(EmployeePayroll::new(id, name, salary))
}
