// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for persistence layer.
//!
//! Every function here writes to the database and expects to be called
//! inside a transaction owned by the caller.

pub mod audit;
pub mod leads;
pub mod orders;
pub mod users;
