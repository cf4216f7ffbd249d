//! Scripted in-memory [`Database`] for exercising repositories without a
//! MySQL server.
//!
//! A [`ScriptedDatabase`] is loaded with an ordered list of [`Step`]s. Every
//! handle call consumes the next step, which must be for the same [`Op`], and
//! is recorded as a [`Call`] so tests can assert on the exact SQL, argument
//! order and leader/follower routing.
//!
//! ```ignore
//! let db = ScriptedDatabase::new([
//!     Step::begin(),
//!     Step::exec(1, 7),
//!     Step::commit(),
//!     Step::row(user_row(7)),
//! ]);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use roster_core::value::SqlValue;

use crate::handle::{Connection, Database, ExecResult, SqlError, Transaction};
use crate::row::Row;

/// Which side of the database a call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Leader,
    Follower,
}

/// Handle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Begin,
    Exec,
    Query,
    QueryRow,
    Scalar,
    Commit,
    Rollback,
}

#[derive(Debug, Clone)]
enum Reply {
    Unit,
    Exec(ExecResult),
    Rows(Vec<Row>),
    Row(Row),
    Scalar(i64),
}

#[derive(Debug, Clone)]
enum Outcome {
    Reply(Reply),
    NotFound,
    Fail(String),
}

/// One scripted response.
#[derive(Debug, Clone)]
pub struct Step {
    op: Op,
    outcome: Outcome,
}

impl Step {
    fn ok(op: Op, reply: Reply) -> Self {
        Self {
            op,
            outcome: Outcome::Reply(reply),
        }
    }

    pub fn begin() -> Self {
        Self::ok(Op::Begin, Reply::Unit)
    }

    /// `exec` succeeds, inside or outside a transaction.
    pub fn exec(rows_affected: u64, last_insert_id: i64) -> Self {
        Self::ok(
            Op::Exec,
            Reply::Exec(ExecResult {
                rows_affected,
                last_insert_id,
            }),
        )
    }

    pub fn rows(rows: Vec<Row>) -> Self {
        Self::ok(Op::Query, Reply::Rows(rows))
    }

    pub fn row(row: Row) -> Self {
        Self::ok(Op::QueryRow, Reply::Row(row))
    }

    pub fn scalar(value: i64) -> Self {
        Self::ok(Op::Scalar, Reply::Scalar(value))
    }

    pub fn commit() -> Self {
        Self::ok(Op::Commit, Reply::Unit)
    }

    pub fn rollback() -> Self {
        Self::ok(Op::Rollback, Reply::Unit)
    }

    /// `op` answers with the not-found sentinel.
    pub fn not_found(op: Op) -> Self {
        Self {
            op,
            outcome: Outcome::NotFound,
        }
    }

    /// `op` fails with `message`.
    pub fn fail(op: Op, message: impl Into<String>) -> Self {
        Self {
            op,
            outcome: Outcome::Fail(message.into()),
        }
    }
}

/// A recorded handle call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub side: Side,
    pub op: Op,
    pub label: String,
    pub sql: String,
    pub args: Vec<SqlValue>,
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    calls: Vec<Call>,
}

impl Script {
    fn answer(&mut self, call: Call) -> Result<Reply, SqlError> {
        let op = call.op;
        self.calls.push(call);

        let step = self
            .steps
            .pop_front()
            .ok_or_else(|| SqlError::Other(format!("Unscripted {op:?} call")))?;
        if step.op != op {
            return Err(SqlError::Other(format!(
                "Expected {:?} call, got {op:?}",
                step.op
            )));
        }

        match step.outcome {
            Outcome::Reply(reply) => Ok(reply),
            Outcome::NotFound => Err(SqlError::NotFound),
            Outcome::Fail(message) => Err(SqlError::Other(message)),
        }
    }
}

type Shared = Arc<Mutex<Script>>;

fn lock(script: &Shared) -> MutexGuard<'_, Script> {
    script.lock().unwrap_or_else(PoisonError::into_inner)
}

fn answer(
    script: &Shared,
    side: Side,
    op: Op,
    label: &str,
    sql: &str,
    args: &[SqlValue],
) -> Result<Reply, SqlError> {
    lock(script).answer(Call {
        side,
        op,
        label: label.to_string(),
        sql: sql.to_string(),
        args: args.to_vec(),
    })
}

fn unexpected(op: Op, reply: &Reply) -> SqlError {
    SqlError::Other(format!("Scripted {reply:?} does not answer {op:?}"))
}

/// In-memory [`Database`] answering from a script.
pub struct ScriptedDatabase {
    script: Shared,
    leader: ScriptedConnection,
    follower: ScriptedConnection,
}

impl ScriptedDatabase {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        let script: Shared = Arc::new(Mutex::new(Script {
            steps: steps.into_iter().collect(),
            calls: Vec::new(),
        }));
        Self {
            leader: ScriptedConnection {
                side: Side::Leader,
                script: Arc::clone(&script),
            },
            follower: ScriptedConnection {
                side: Side::Follower,
                script: Arc::clone(&script),
            },
            script,
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.script).calls.clone()
    }

    /// Panic unless every scripted step was consumed.
    pub fn assert_exhausted(&self) {
        let script = lock(&self.script);
        assert!(
            script.steps.is_empty(),
            "unconsumed steps: {:?}; calls: {:?}",
            script.steps,
            script.calls
        );
    }
}

impl Database for ScriptedDatabase {
    fn leader(&self) -> &dyn Connection {
        &self.leader
    }

    fn follower(&self) -> &dyn Connection {
        &self.follower
    }
}

struct ScriptedConnection {
    side: Side,
    script: Shared,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn begin_tx(&self, label: &str) -> Result<Box<dyn Transaction>, SqlError> {
        answer(&self.script, self.side, Op::Begin, label, "", &[])?;
        Ok(Box::new(ScriptedTransaction {
            side: self.side,
            label: label.to_string(),
            script: Arc::clone(&self.script),
        }))
    }

    async fn exec(
        &self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<ExecResult, SqlError> {
        match answer(&self.script, self.side, Op::Exec, label, sql, args)? {
            Reply::Exec(result) => Ok(result),
            other => Err(unexpected(Op::Exec, &other)),
        }
    }

    async fn query(
        &self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<Vec<Row>, SqlError> {
        match answer(&self.script, self.side, Op::Query, label, sql, args)? {
            Reply::Rows(rows) => Ok(rows),
            other => Err(unexpected(Op::Query, &other)),
        }
    }

    async fn query_row(
        &self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<Row, SqlError> {
        match answer(&self.script, self.side, Op::QueryRow, label, sql, args)? {
            Reply::Row(row) => Ok(row),
            other => Err(unexpected(Op::QueryRow, &other)),
        }
    }

    async fn get_i64(&self, label: &str, sql: &str, args: &[SqlValue]) -> Result<i64, SqlError> {
        match answer(&self.script, self.side, Op::Scalar, label, sql, args)? {
            Reply::Scalar(value) => Ok(value),
            other => Err(unexpected(Op::Scalar, &other)),
        }
    }
}

struct ScriptedTransaction {
    side: Side,
    label: String,
    script: Shared,
}

#[async_trait]
impl Transaction for ScriptedTransaction {
    async fn exec(
        &mut self,
        label: &str,
        sql: &str,
        args: &[SqlValue],
    ) -> Result<ExecResult, SqlError> {
        match answer(&self.script, self.side, Op::Exec, label, sql, args)? {
            Reply::Exec(result) => Ok(result),
            other => Err(unexpected(Op::Exec, &other)),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), SqlError> {
        answer(&self.script, self.side, Op::Commit, &self.label, "", &[]).map(|_| ())
    }

    async fn rollback(self: Box<Self>) -> Result<(), SqlError> {
        answer(&self.script, self.side, Op::Rollback, &self.label, "", &[]).map(|_| ())
    }
}
